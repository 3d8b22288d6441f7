//! Single-step optimizer update rules.
//!
//! The optimizer catalogue exercises exactly one update per case, applied to
//! a named parameter map that mirrors the rendered target invocation. State
//! buffers (momentum, second moments) therefore start from zero and the
//! rules below are written with the first-step bias corrections in place.
//!
//! # References
//!
//! - Kingma, D. P., & Ba, J. (2015). Adam: A method for stochastic
//!   optimization. ICLR.
//! - Loshchilov, I., & Hutter, F. (2019). Decoupled weight decay
//!   regularization. ICLR.
//! - Shazeer, N., & Stern, M. (2018). Adafactor: Adaptive learning rates
//!   with sublinear memory cost. ICML.

use std::collections::BTreeMap;
use std::ops::Index;

use crate::tensor::{Dtype, Tensor};

/// A named, deterministically ordered parameter map.
#[derive(Debug, Clone, Default)]
pub struct Parameters {
    entries: BTreeMap<String, Tensor>,
}

impl Parameters {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Tensor) {
        self.entries.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Tensor)> {
        self.entries.iter()
    }
}

impl Index<&str> for Parameters {
    type Output = Tensor;

    fn index(&self, name: &str) -> &Tensor {
        self.entries
            .get(name)
            .unwrap_or_else(|| panic!("no parameter named `{name}`"))
    }
}

/// One optimization step over a parameter map.
pub trait Optimizer {
    /// The update rule for a single parameter.
    fn update(&self, grad: &Tensor, param: &Tensor) -> Tensor;

    /// Apply [`Optimizer::update`] to every parameter that has a gradient.
    fn apply(&self, gradients: &Parameters, parameters: &Parameters) -> Parameters {
        let mut out = Parameters::new();
        for (name, param) in parameters.iter() {
            let updated = match gradients.get(name) {
                Some(grad) => self.update(grad, param),
                None => param.clone(),
            };
            out.insert(name.clone(), updated);
        }
        out
    }
}

fn zip3<F: Fn(f32, f32) -> f32>(a: &Tensor, b: &Tensor, f: F) -> Tensor {
    a.zip(b, Dtype::Float32, f)
}

/// Stochastic gradient descent with optional momentum and dampening.
///
/// First step: v = (1 - dampening) * g, p' = p - lr * v.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    lr: f32,
    momentum: f32,
    dampening: f32,
}

impl Sgd {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            momentum: 0.0,
            dampening: 0.0,
        }
    }

    #[must_use]
    pub fn with_momentum(mut self, momentum: f32) -> Self {
        self.momentum = momentum;
        self
    }

    #[must_use]
    pub fn with_dampening(mut self, dampening: f32) -> Self {
        self.dampening = dampening;
        self
    }
}

impl Optimizer for Sgd {
    fn update(&self, grad: &Tensor, param: &Tensor) -> Tensor {
        let step = if self.momentum > 0.0 {
            1.0 - self.dampening
        } else {
            1.0
        };
        let lr = self.lr;
        zip3(param, grad, |p, g| p - lr * step * g)
    }
}

/// RMSprop with the conventional smoothing constant 0.99.
#[derive(Debug, Clone, Copy)]
pub struct RmsProp {
    lr: f32,
    alpha: f32,
    eps: f32,
}

impl RmsProp {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            alpha: 0.99,
            eps: 1e-8,
        }
    }
}

impl Optimizer for RmsProp {
    fn update(&self, grad: &Tensor, param: &Tensor) -> Tensor {
        let (lr, alpha, eps) = (self.lr, self.alpha, self.eps);
        zip3(param, grad, |p, g| {
            let v = (1.0 - alpha) * g * g;
            p - lr * g / (v.sqrt() + eps)
        })
    }
}

/// Adagrad: per-parameter accumulated squared gradients.
#[derive(Debug, Clone, Copy)]
pub struct AdaGrad {
    lr: f32,
    eps: f32,
}

impl AdaGrad {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self { lr, eps: 1e-8 }
    }
}

impl Optimizer for AdaGrad {
    fn update(&self, grad: &Tensor, param: &Tensor) -> Tensor {
        let (lr, eps) = (self.lr, self.eps);
        zip3(param, grad, |p, g| p - lr * g / ((g * g).sqrt() + eps))
    }
}

/// Adadelta (Zeiler, 2012).
#[derive(Debug, Clone, Copy)]
pub struct AdaDelta {
    lr: f32,
    rho: f32,
    eps: f32,
}

impl AdaDelta {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            rho: 0.9,
            eps: 1e-6,
        }
    }
}

impl Optimizer for AdaDelta {
    fn update(&self, grad: &Tensor, param: &Tensor) -> Tensor {
        let (lr, rho, eps) = (self.lr, self.rho, self.eps);
        zip3(param, grad, |p, g| {
            let acc = (1.0 - rho) * g * g;
            let delta = (eps.sqrt() / (acc + eps).sqrt()) * g;
            p - lr * delta
        })
    }
}

/// Adam with first-step bias correction.
#[derive(Debug, Clone, Copy)]
pub struct Adam {
    lr: f32,
    beta1: f32,
    beta2: f32,
    eps: f32,
}

impl Adam {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            beta2: 0.999,
            eps: 1e-8,
        }
    }
}

impl Optimizer for Adam {
    fn update(&self, grad: &Tensor, param: &Tensor) -> Tensor {
        let (lr, beta1, beta2, eps) = (self.lr, self.beta1, self.beta2, self.eps);
        zip3(param, grad, |p, g| {
            let m_hat = (1.0 - beta1) * g / (1.0 - beta1);
            let v_hat = (1.0 - beta2) * g * g / (1.0 - beta2);
            p - lr * m_hat / (v_hat.sqrt() + eps)
        })
    }
}

/// AdamW: Adam with decoupled weight decay.
#[derive(Debug, Clone, Copy)]
pub struct AdamW {
    adam: Adam,
    weight_decay: f32,
}

impl AdamW {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            adam: Adam::new(lr),
            weight_decay: 0.01,
        }
    }
}

impl Optimizer for AdamW {
    fn update(&self, grad: &Tensor, param: &Tensor) -> Tensor {
        let decayed = param.map(|p| p * (1.0 - self.adam.lr * self.weight_decay));
        self.adam.update(grad, &decayed)
    }
}

/// Adamax: Adam with an infinity-norm second moment.
#[derive(Debug, Clone, Copy)]
pub struct Adamax {
    lr: f32,
    beta1: f32,
    eps: f32,
}

impl Adamax {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            eps: 1e-8,
        }
    }
}

impl Optimizer for Adamax {
    fn update(&self, grad: &Tensor, param: &Tensor) -> Tensor {
        let (lr, beta1, eps) = (self.lr, self.beta1, self.eps);
        zip3(param, grad, |p, g| {
            let m = (1.0 - beta1) * g;
            let u = g.abs();
            p - (lr / (1.0 - beta1)) * m / (u + eps)
        })
    }
}

/// Lion (Chen et al., 2023): sign of the interpolated momentum.
#[derive(Debug, Clone, Copy)]
pub struct Lion {
    lr: f32,
    beta1: f32,
    weight_decay: f32,
}

impl Lion {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            beta1: 0.9,
            weight_decay: 0.0,
        }
    }

    #[must_use]
    pub fn with_weight_decay(mut self, weight_decay: f32) -> Self {
        self.weight_decay = weight_decay;
        self
    }
}

fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl Optimizer for Lion {
    fn update(&self, grad: &Tensor, param: &Tensor) -> Tensor {
        let (lr, beta1, wd) = (self.lr, self.beta1, self.weight_decay);
        zip3(param, grad, |p, g| {
            let c = (1.0 - beta1) * g;
            p - lr * (sign(c) + wd * p)
        })
    }
}

/// Adafactor with a factored second moment for matrices and the
/// update-RMS clipping of the paper; vectors fall back to the non-factored
/// accumulator.
#[derive(Debug, Clone, Copy)]
pub struct Adafactor {
    lr: f32,
    eps1: f32,
    clip_threshold: f32,
    beta1: Option<f32>,
}

impl Adafactor {
    #[must_use]
    pub fn new(lr: f32) -> Self {
        Self {
            lr,
            eps1: 1e-30,
            clip_threshold: 1.0,
            beta1: None,
        }
    }

    /// Enable the first-moment accumulator.
    #[must_use]
    pub fn with_beta1(mut self, beta1: f32) -> Self {
        self.beta1 = Some(beta1);
        self
    }

    fn raw_update(&self, grad: &Tensor) -> Tensor {
        if grad.ndim() == 2 {
            let (rows, cols) = (grad.shape()[0], grad.shape()[1]);
            let gd = grad.data();
            let sq: Vec<f32> = gd.iter().map(|&g| g * g + self.eps1).collect();
            let mut row_sum = vec![0.0f32; rows];
            let mut col_sum = vec![0.0f32; cols];
            for r in 0..rows {
                for c in 0..cols {
                    let v = sq[r * cols + c];
                    row_sum[r] += v;
                    col_sum[c] += v;
                }
            }
            let total: f32 = row_sum.iter().sum();
            let data: Vec<f32> = (0..rows * cols)
                .map(|i| {
                    let v = row_sum[i / cols] * col_sum[i % cols] / total;
                    gd[i] / v.sqrt()
                })
                .collect();
            Tensor::new(data, grad.shape())
        } else {
            grad.map(|g| g / (g * g + self.eps1).sqrt())
        }
    }
}

impl Optimizer for Adafactor {
    fn update(&self, grad: &Tensor, param: &Tensor) -> Tensor {
        let mut update = self.raw_update(grad);
        let rms = (update.map(|u| u * u).mean().item()).sqrt();
        let divisor = (rms / self.clip_threshold).max(1.0);
        update = update.map(|u| u / divisor);
        if let Some(beta1) = self.beta1 {
            update = update.map(|u| (1.0 - beta1) * u);
        }
        let lr = self.lr;
        zip3(param, &update, |p, u| p - lr * u)
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
