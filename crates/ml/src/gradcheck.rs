//! Finite-difference verification of [`PolicyNetwork::compute_gradients_into`].
//!
//! For a fixed `(state, action, advantage)` the objective
//! `J(θ) = advantage · ln π(action | state)` is evaluated in double precision
//! at `θ ± ε` for individual parameters, and the central difference is
//! compared against the analytic gradient.

use serde::Serialize;

use crate::nn::log_softmax_at;
use crate::policy::{ParamTensor, PolicyNetwork, ADVANTAGE_CLIP};
use crate::rng::RandomSource;

/// Perturbation applied to each probed parameter.
pub const FD_EPSILON: f32 = 1e-5;

/// Largest relative error accepted for any probed parameter.
pub const REL_ERROR_THRESHOLD: f64 = 1e-4;

/// Per-tensor outcome.
#[derive(Debug, Clone, Serialize)]
pub struct TensorCheck {
    pub tensor: &'static str,
    pub checked: usize,
    /// Indices whose perturbation would cross a ReLU kink.
    pub skipped: usize,
    pub max_relative_error: f64,
}

/// Outcome of one gradient check.
#[derive(Debug, Clone, Serialize)]
pub struct GradCheckReport {
    pub passed: bool,
    pub max_relative_error: f64,
    pub threshold: f64,
    pub tensors: Vec<TensorCheck>,
}

/// `advantage · ln π(action | state)` with the same advantage clipping as
/// the analytic gradient.
#[must_use]
pub fn objective(policy: &PolicyNetwork, state: &[f32], action: usize, advantage: f32) -> f64 {
    let mut activations = policy.new_activations();
    let cache = policy.forward_with_cache(state, &mut activations);
    let advantage = f64::from(advantage.clamp(-ADVANTAGE_CLIP, ADVANTAGE_CLIP));
    advantage * log_softmax_at(cache.logits, action)
}

/// `|n − a| / (|n| + |a| + ε)`.
#[must_use]
pub fn relative_error(numeric: f64, analytic: f64) -> f64 {
    (numeric - analytic).abs() / (numeric.abs() + analytic.abs() + f64::from(FD_EPSILON))
}

/// Probes up to `samples_per_tensor` indices of every parameter tensor.
///
/// When a tensor has no more than `samples_per_tensor` entries every index
/// is probed; otherwise indices are drawn from `rng`.
pub fn check_gradients(
    policy: &PolicyNetwork,
    state: &[f32],
    action: usize,
    advantage: f32,
    samples_per_tensor: usize,
    rng: &mut impl RandomSource,
) -> GradCheckReport {
    let mut activations = policy.new_activations();
    let mut analytic = policy.create_accumulator();
    let cache = policy.forward_with_cache(state, &mut activations);
    policy.compute_gradients_into(&mut analytic, state, action, advantage, &cache);
    let hidden_pre = cache.hidden_pre.to_vec();

    let state_size = policy.state_size();
    let eps = f64::from(FD_EPSILON);
    // A ReLU unit whose pre-activation moves by up to `reach` could change
    // sides, which makes the central difference meaningless.
    let near_kink = |h: usize, reach: f64| hidden_pre[h].abs() <= 2.0 * reach;

    let mut probe = policy.clone();
    let mut tensors = Vec::with_capacity(ParamTensor::ALL.len());
    for t in ParamTensor::ALL {
        let len = policy.param(t).len();
        let indices: Vec<usize> = if len <= samples_per_tensor {
            (0..len).collect()
        } else {
            (0..samples_per_tensor).map(|_| rng.index(len)).collect()
        };

        let mut check = TensorCheck { tensor: t.name(), checked: 0, skipped: 0, max_relative_error: 0.0 };
        for idx in indices {
            let straddles = match t {
                ParamTensor::W1 => near_kink(idx / state_size, eps * f64::from(state[idx % state_size]).abs()),
                ParamTensor::B1 => near_kink(idx, eps),
                ParamTensor::W2 | ParamTensor::B2 => false,
            };
            if straddles {
                check.skipped += 1;
                continue;
            }

            let original = policy.param(t)[idx];
            probe.param_mut(t)[idx] = original + FD_EPSILON;
            let w_plus = probe.param(t)[idx];
            let j_plus = objective(&probe, state, action, advantage);
            probe.param_mut(t)[idx] = original - FD_EPSILON;
            let w_minus = probe.param(t)[idx];
            let j_minus = objective(&probe, state, action, advantage);
            probe.param_mut(t)[idx] = original;

            // divide by the step actually stored, not the nominal 2ε
            let numeric = (j_plus - j_minus) / (f64::from(w_plus) - f64::from(w_minus));
            let err = relative_error(numeric, f64::from(analytic.tensor(t)[idx]));
            check.checked += 1;
            check.max_relative_error = check.max_relative_error.max(err);
        }
        tensors.push(check);
    }

    let max_relative_error = tensors.iter().map(|c| c.max_relative_error).fold(0.0, f64::max);
    let passed = max_relative_error < REL_ERROR_THRESHOLD && tensors.iter().all(|c| c.checked > 0);
    GradCheckReport { passed, max_relative_error, threshold: REL_ERROR_THRESHOLD, tensors }
}
