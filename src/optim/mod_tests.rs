use super::*;
use crate::tensor::Tensor;

fn params_of(t: Tensor) -> Parameters {
    let mut p = Parameters::new();
    p.insert("a", t);
    p
}

#[test]
fn test_sgd_plain_step() {
    let p = params_of(Tensor::new(vec![1.0, 2.0], &[2]));
    let g = params_of(Tensor::new(vec![0.5, -0.5], &[2]));
    let out = Sgd::new(0.1).apply(&g, &p);
    assert_eq!(out["a"].data(), &[0.95, 2.05]);
}

#[test]
fn test_sgd_dampening_scales_first_step() {
    let p = params_of(Tensor::new(vec![1.0], &[1]));
    let g = params_of(Tensor::new(vec![1.0], &[1]));
    let out = Sgd::new(0.1)
        .with_momentum(0.1)
        .with_dampening(0.1)
        .apply(&g, &p);
    assert!((out["a"].data()[0] - (1.0 - 0.1 * 0.9)).abs() < 1e-6);
}

#[test]
fn test_adam_first_step_is_signlike() {
    let p = params_of(Tensor::new(vec![0.0, 0.0], &[2]));
    let g = params_of(Tensor::new(vec![3.0, -3.0], &[2]));
    let out = Adam::new(0.1).apply(&g, &p);
    assert!((out["a"].data()[0] + 0.1).abs() < 1e-4);
    assert!((out["a"].data()[1] - 0.1).abs() < 1e-4);
}

#[test]
fn test_adamw_decays_weights() {
    let p = params_of(Tensor::new(vec![10.0], &[1]));
    let g = params_of(Tensor::new(vec![0.0], &[1]));
    let out = AdamW::new(0.1).apply(&g, &p);
    assert!(out["a"].data()[0] < 10.0);
}

#[test]
fn test_lion_steps_by_sign() {
    let p = params_of(Tensor::new(vec![1.0, 1.0, 1.0], &[3]));
    let g = params_of(Tensor::new(vec![5.0, -5.0, 0.0], &[3]));
    let out = Lion::new(0.1).apply(&g, &p);
    assert_eq!(out["a"].data(), &[0.9, 1.1, 1.0]);
}

#[test]
fn test_lion_weight_decay_pulls_toward_zero() {
    let p = params_of(Tensor::new(vec![1.0], &[1]));
    let g = params_of(Tensor::new(vec![0.0], &[1]));
    let out = Lion::new(0.1).with_weight_decay(0.1).apply(&g, &p);
    assert!((out["a"].data()[0] - 0.99).abs() < 1e-6);
}

#[test]
fn test_adafactor_matrix_and_vector_paths() {
    let matrix = Tensor::new(vec![0.5, -0.25, 1.0, 0.75], &[2, 2]);
    let vector = Tensor::new(vec![0.5, -0.25], &[2]);
    let opt = Adafactor::new(0.1);
    let m_out = opt.apply(&params_of(matrix.clone()), &params_of(Tensor::zeros(&[2, 2])));
    let v_out = opt.apply(&params_of(vector.clone()), &params_of(Tensor::zeros(&[2])));
    assert_eq!(m_out["a"].shape(), [2, 2]);
    assert_eq!(v_out["a"].shape(), [2]);
    assert!(m_out["a"].data().iter().all(|v| v.is_finite()));
    assert!(v_out["a"].data().iter().all(|v| v.is_finite()));
}

#[test]
fn test_apply_preserves_gradientless_params() {
    let mut p = Parameters::new();
    p.insert("a", Tensor::new(vec![1.0], &[1]));
    p.insert("b", Tensor::new(vec![2.0], &[1]));
    let g = params_of(Tensor::new(vec![1.0], &[1]));
    let out = Sgd::new(0.1).apply(&g, &p);
    assert_eq!(out["b"].data(), &[2.0]);
}

#[test]
#[should_panic(expected = "no parameter named")]
fn test_missing_parameter_panics() {
    let p = Parameters::new();
    let _ = &p["missing"];
}
