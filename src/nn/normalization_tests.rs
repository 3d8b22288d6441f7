use super::*;
use crate::tensor::RandomStream;

fn rng() -> RandomStream {
    RandomStream::new(0)
}

#[test]
fn test_layer_norm_rows_standardized() {
    let mut r = RandomStream::new(17);
    let x = r.normal(&[2, 8, 16]);
    let y = LayerNorm::new(16).forward(&mut rng(), &x);
    assert_eq!(y.shape(), [2, 8, 16]);
    let row_means = y.mean_axis(-1);
    for &m in row_means.data() {
        assert!(m.abs() < 1e-4, "row mean {m} not near zero");
    }
}

#[test]
fn test_rms_norm_unit_rms() {
    let mut r = RandomStream::new(18);
    let x = r.normal(&[4, 16]);
    let y = RmsNorm::new(16).forward(&mut rng(), &x);
    let ms = y.map(|v| v * v).mean_axis(-1);
    for &m in ms.data() {
        assert!((m - 1.0).abs() < 1e-3, "row mean square {m}");
    }
}

#[test]
fn test_instance_norm_interior_stats() {
    let mut r = RandomStream::new(19);
    let x = r.normal(&[2, 8, 16]);
    let y = InstanceNorm::new(8).forward(&mut rng(), &x);
    assert_eq!(y.shape(), [2, 8, 16]);
    // Per (batch, channel) lane mean should vanish.
    for b in 0..2 {
        for c in 0..16 {
            let lane_mean: f32 =
                (0..8).map(|s| y.data()[(b * 8 + s) * 16 + c]).sum::<f32>() / 8.0;
            assert!(lane_mean.abs() < 1e-4);
        }
    }
}

#[test]
fn test_group_norm_group_stats() {
    let mut r = RandomStream::new(20);
    let x = r.normal(&[2, 8, 16]);
    let y = GroupNorm::new(4, 16).forward(&mut rng(), &x);
    assert_eq!(y.shape(), [2, 8, 16]);
    for b in 0..2 {
        for g in 0..4 {
            let mut sum = 0.0f32;
            for s in 0..8 {
                for k in 0..4 {
                    sum += y.data()[(b * 8 + s) * 16 + g * 4 + k];
                }
            }
            assert!((sum / 32.0).abs() < 1e-4);
        }
    }
}

#[test]
fn test_batch_norm_channel_stats() {
    let mut r = RandomStream::new(21);
    let x = r.normal(&[2, 8, 16]);
    let y = BatchNorm::new(16).forward(&mut rng(), &x);
    let channel_means = y.mean_axes(&[0, 1]);
    for &m in channel_means.data() {
        assert!(m.abs() < 1e-4);
    }
}

#[test]
#[should_panic(expected = "not divisible")]
fn test_group_norm_rejects_ragged_groups() {
    let _ = GroupNorm::new(3, 16);
}
