//! Layer math shared by the policy network.
//!
//! Parameters and gradient accumulators are stored as `f32`. Activations and
//! every intermediate sum are carried in `f64`, and only the final per-sample
//! gradient is rounded when it is added into an accumulator.

use crate::rng::RandomSource;

/// Floor added inside every logarithm of a probability.
pub const LOG_EPS: f64 = 1e-8;

/// A fully connected layer stored as flat row-major arrays.
///
/// `w` has `out_dim` rows of `in_dim` weights, so output `o` reads
/// `w[o * in_dim..(o + 1) * in_dim]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Dense {
    /// The weight matrix for the layer, `[out_dim][in_dim]`.
    pub w: Vec<f32>,
    /// The bias vector for the layer.
    pub b: Vec<f32>,
    /// The number of input dimensions.
    pub in_dim: usize,
    /// The number of output dimensions.
    pub out_dim: usize,
}

impl Dense {
    /// Creates a new `Dense` layer with the given weights and biases.
    #[must_use]
    pub fn new(weights: Vec<f32>, bias: Vec<f32>, in_dim: usize, out_dim: usize) -> Self {
        assert_eq!(weights.len(), in_dim * out_dim);
        assert_eq!(bias.len(), out_dim);
        Self { w: weights, b: bias, in_dim, out_dim }
    }

    /// Glorot-uniform weights in `±sqrt(6 / (in + out))`, zero biases.
    pub fn xavier(in_dim: usize, out_dim: usize, rng: &mut impl RandomSource) -> Self {
        let limit = (6.0f32 / (in_dim as f32 + out_dim as f32)).sqrt();
        let weights: Vec<f32> = (0..in_dim * out_dim).map(|_| rng.uniform(-limit, limit)).collect();
        let bias = vec![0.0; out_dim];
        Self::new(weights, bias, in_dim, out_dim)
    }

    /// Row `o` of the weight matrix.
    #[must_use]
    pub fn row(&self, o: usize) -> &[f32] {
        &self.w[o * self.in_dim..(o + 1) * self.in_dim]
    }

    /// `y = W x + b`, written into `y`.
    pub fn forward_into<X: Copy + Into<f64>>(&self, x: &[X], y: &mut [f64]) {
        debug_assert_eq!(x.len(), self.in_dim);
        debug_assert_eq!(y.len(), self.out_dim);
        for (o, out) in y.iter_mut().enumerate() {
            let mut sum = f64::from(self.b[o]);
            for (&wv, &xv) in self.row(o).iter().zip(x) {
                let xv: f64 = xv.into();
                sum += f64::from(wv) * xv;
            }
            *out = sum;
        }
    }

    /// Adds the parameter gradients for upstream gradient `grad` at input `x`
    /// into `grad_w` / `grad_b`. Nothing is overwritten.
    pub fn accumulate_backward<X: Copy + Into<f64>>(
        &self,
        x: &[X],
        grad: &[f64],
        grad_w: &mut [f32],
        grad_b: &mut [f32],
    ) {
        debug_assert_eq!(grad_w.len(), self.w.len());
        debug_assert_eq!(grad_b.len(), self.out_dim);
        for (o, &go) in grad.iter().enumerate() {
            if go == 0.0 {
                continue;
            }
            let row = &mut grad_w[o * self.in_dim..(o + 1) * self.in_dim];
            for (gw, &xv) in row.iter_mut().zip(x) {
                let xv: f64 = xv.into();
                *gw += (go * xv) as f32;
            }
            grad_b[o] += go as f32;
        }
    }

    /// Gradient with respect to input `i` given upstream gradient `grad`:
    /// `Σ_o W[o][i] · grad[o]`.
    #[must_use]
    pub fn input_grad(&self, i: usize, grad: &[f64]) -> f64 {
        grad.iter()
            .enumerate()
            .map(|(o, &go)| f64::from(self.w[o * self.in_dim + i]) * go)
            .sum()
    }
}

/// Element-wise `max(x, 0)`.
pub fn relu_into(x: &[f64], y: &mut [f64]) {
    for (out, &v) in y.iter_mut().zip(x) {
        *out = v.max(0.0);
    }
}

/// Numerically stable softmax: shifts by the max logit before exponentiating.
pub fn softmax_into(logits: &[f64], probs: &mut [f64]) {
    let m = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mut sum = 0.0;
    for (p, &l) in probs.iter_mut().zip(logits) {
        *p = (l - m).exp();
        sum += *p;
    }
    for p in probs.iter_mut() {
        *p /= sum;
    }
}

/// `ln softmax(logits)[index]`, computed without forming the probabilities.
#[must_use]
pub fn log_softmax_at(logits: &[f64], index: usize) -> f64 {
    let m = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let log_sum: f64 = logits.iter().map(|&l| (l - m).exp()).sum::<f64>().ln();
    logits[index] - m - log_sum
}

/// `-Σ p · ln(p + ε)`.
#[must_use]
pub fn entropy(probs: &[f64]) -> f64 {
    -probs.iter().map(|&p| p * (p + LOG_EPS).ln()).sum::<f64>()
}
