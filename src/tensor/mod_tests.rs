use super::*;

#[test]
fn test_scalar_tensor_shape() {
    let t = Tensor::scalar(2.5);
    assert!(t.shape().is_empty());
    assert_eq!(t.numel(), 1);
    assert_eq!(t.item(), 2.5);
}

#[test]
fn test_sum_and_mean() {
    let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    assert_eq!(t.sum().item(), 21.0);
    assert_eq!(t.mean().item(), 3.5);
}

#[test]
fn test_sum_axis_negative() {
    let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3]);
    let s = t.sum_axis(-1);
    assert_eq!(s.shape(), [2]);
    assert_eq!(s.data(), &[6.0, 15.0]);
}

#[test]
fn test_sum_axes_removes_both() {
    let t = Tensor::ones(&[2, 3, 4, 3]);
    let s = t.sum_axes(&[0, -1]);
    assert_eq!(s.shape(), [3, 4]);
    assert_eq!(s.data()[0], 6.0);
}

#[test]
fn test_mean_keepdims_broadcasts_back() {
    let t = Tensor::new(vec![1.0, 3.0, 2.0, 4.0], &[2, 2]);
    let m = t.mean_over(&[1], true);
    assert_eq!(m.shape(), [2, 1]);
    let centered = t.zip(&m, Dtype::Float32, |x, mu| x - mu);
    assert_eq!(centered.shape(), [2, 2]);
    assert_eq!(centered.sum().item(), 0.0);
}

#[test]
fn test_var_population() {
    let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], &[4]);
    assert!((t.var().item() - 1.25).abs() < 1e-6);
}

#[test]
fn test_max_min_prod() {
    let t = Tensor::new(vec![3.0, -1.0, 2.0, 5.0], &[2, 2]);
    assert_eq!(t.max().item(), 5.0);
    assert_eq!(t.min().item(), -1.0);
    assert_eq!(t.prod().item(), -30.0);
}

#[test]
fn test_all_any_dtype_and_values() {
    let t = Tensor::new(vec![1.0, 0.0, 2.0], &[3]);
    assert_eq!(t.all().dtype(), Dtype::Bool);
    assert_eq!(t.all().item(), 0.0);
    assert_eq!(t.any().item(), 1.0);
}

#[test]
fn test_all_axis_rows() {
    let t = Tensor::new(vec![1.0, 1.0, 1.0, 0.0], &[2, 2]);
    let a = t.all_axis(-1);
    assert_eq!(a.shape(), [2]);
    assert_eq!(a.data(), &[1.0, 0.0]);
}

#[test]
fn test_logsumexp_matches_naive() {
    let t = Tensor::new(vec![0.1, 0.7, -0.4], &[3]);
    let naive: f32 = t.data().iter().map(|v| v.exp()).sum::<f32>().ln();
    assert!((t.logsumexp().item() - naive).abs() < 1e-5);
}

#[test]
fn test_softmax_axis_sums_to_one() {
    let t = Tensor::new(vec![0.5, 1.0, -2.0, 0.0, 3.0, 1.0], &[2, 3]);
    let s = t.softmax_axis(-1);
    assert_eq!(s.shape(), [2, 3]);
    let rows = s.sum_axis(-1);
    for &r in rows.data() {
        assert!((r - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_argmax_flat_and_axis() {
    let t = Tensor::new(vec![1.0, 9.0, 3.0, 7.0, 2.0, 8.0], &[2, 3]);
    let flat = t.argmax();
    assert!(flat.shape().is_empty());
    assert_eq!(flat.dtype(), Dtype::Int32);
    assert_eq!(flat.item(), 1.0);
    let per_row = t.argmax_axis(-1);
    assert_eq!(per_row.data(), &[1.0, 2.0]);
}

#[test]
fn test_cumsum_bare_flattens() {
    let t = Tensor::new(vec![1.0, 2.0, 3.0, 4.0], &[2, 2]);
    let c = t.cumsum();
    assert_eq!(c.shape(), [4]);
    assert_eq!(c.data(), &[1.0, 3.0, 6.0, 10.0]);
}

#[test]
fn test_cummax_along_axis() {
    let t = Tensor::new(vec![1.0, 3.0, 2.0, 0.0, 5.0, 4.0], &[2, 3]);
    let c = t.cummax_axis(-1);
    assert_eq!(c.shape(), [2, 3]);
    assert_eq!(c.data(), &[1.0, 3.0, 3.0, 0.0, 5.0, 5.0]);
}

#[test]
fn test_expand_dims_axis_positions() {
    let t = Tensor::ones(&[4, 3]);
    assert_eq!(t.expand_dims_axis(-1).shape(), [4, 3, 1]);
    assert_eq!(t.expand_dims_axis(0).shape(), [1, 4, 3]);
}

#[test]
fn test_expand_dims_axes_pair() {
    let t = Tensor::ones(&[2, 3, 4, 3]);
    let e = t.expand_dims_axes(&[0, -1]);
    assert_eq!(e.shape(), [1, 2, 3, 4, 3, 1]);
}

#[test]
fn test_index_last_drops_axis() {
    let t = Tensor::new((0..24).map(|i| i as f32).collect(), &[2, 3, 4]);
    let col = t.index_last(0);
    assert_eq!(col.shape(), [2, 3]);
    assert_eq!(col.data(), &[0.0, 4.0, 8.0, 12.0, 16.0, 20.0]);
}

#[test]
fn test_index_prefix_keeps_remainder() {
    let t = Tensor::new((0..24).map(|i| i as f32).collect(), &[2, 3, 4]);
    let row = t.index_prefix(&[1, 2]);
    assert_eq!(row.shape(), [4]);
    assert_eq!(row.data(), &[20.0, 21.0, 22.0, 23.0]);
}

#[test]
fn test_zip_broadcast_row_vector() {
    let a = Tensor::ones(&[2, 3]);
    let b = Tensor::new(vec![1.0, 2.0, 3.0], &[3]);
    let c = a.zip(&b, Dtype::Float32, |x, y| x * y);
    assert_eq!(c.shape(), [2, 3]);
    assert_eq!(c.data(), &[1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
}

#[test]
fn test_value_as_tensor() {
    let v = Value::Scalar(1.5);
    assert!(!v.is_tensor());
    assert!(v.as_tensor().shape().is_empty());
    let t = Value::Tensor(Tensor::ones(&[2]));
    assert!(t.is_tensor());
    assert_eq!(t.tensor().unwrap().shape(), [2]);
}

#[test]
#[should_panic(expected = "broadcast-compatible")]
fn test_zip_incompatible_shapes_panics() {
    let a = Tensor::ones(&[2, 3]);
    let b = Tensor::ones(&[4]);
    let _ = a.zip(&b, Dtype::Float32, |x, y| x + y);
}
