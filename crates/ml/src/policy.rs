//! # Policy Network
//!
//! A two-layer categorical policy, `Linear(D→H) → ReLU → Linear(H→A) → softmax`,
//! with a hand-written backward pass for the REINFORCE objective
//! `advantage · ln π(action | state)`.
//!
//! The forward pass never allocates: intermediate values are written into an
//! [`Activations`] scratch owned by the caller, and [`ForwardCache`] hands out
//! borrowed views into it. The borrow ends the next time the scratch is
//! reused, so a stale cache cannot be observed.
//!
//! Gradients are *added* into a [`PolicyGrads`] accumulator so a whole rollout
//! can be summed against one parameter snapshot and applied in a single
//! [`PolicyNetwork::apply_gradients`] call.

use crate::error::MlError;
use crate::nn::{relu_into, softmax_into, Dense};
use crate::params::PolicyParams;
use crate::rng::RandomSource;

/// Per-sample advantages are clipped to `±ADVANTAGE_CLIP` before scaling.
pub const ADVANTAGE_CLIP: f32 = 5.0;

/// Names the four parameter tensors in a fixed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamTensor {
    W1,
    B1,
    W2,
    B2,
}

impl ParamTensor {
    pub const ALL: [ParamTensor; 4] = [ParamTensor::W1, ParamTensor::B1, ParamTensor::W2, ParamTensor::B2];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            ParamTensor::W1 => "w1",
            ParamTensor::B1 => "b1",
            ParamTensor::W2 => "w2",
            ParamTensor::B2 => "b2",
        }
    }
}

/// Scratch storage for one forward pass.
#[derive(Debug, Clone)]
pub struct Activations {
    hidden_pre: Vec<f64>,
    hidden: Vec<f64>,
    logits: Vec<f64>,
    probs: Vec<f64>,
}

/// Borrowed views of the most recent forward pass, in double precision.
#[derive(Debug, Clone, Copy)]
pub struct ForwardCache<'a> {
    pub hidden_pre: &'a [f64],
    pub hidden: &'a [f64],
    pub logits: &'a [f64],
    pub probs: &'a [f64],
}

/// Gradient accumulator shaped like the policy parameters.
#[derive(Debug, Clone)]
pub struct PolicyGrads {
    pub w1: Vec<f32>,
    pub b1: Vec<f32>,
    pub w2: Vec<f32>,
    pub b2: Vec<f32>,
    // backward scratch, not part of the gradient
    d_logits: Vec<f64>,
    d_hidden: Vec<f64>,
}

impl PolicyGrads {
    /// Resets every gradient tensor to zero without reallocating.
    pub fn zero(&mut self) {
        for t in ParamTensor::ALL {
            self.tensor_mut(t).fill(0.0);
        }
    }

    /// Multiplies every gradient tensor by `factor`.
    pub fn scale(&mut self, factor: f32) {
        for t in ParamTensor::ALL {
            for g in self.tensor_mut(t) {
                *g *= factor;
            }
        }
    }

    #[must_use]
    pub fn tensor(&self, t: ParamTensor) -> &[f32] {
        match t {
            ParamTensor::W1 => &self.w1,
            ParamTensor::B1 => &self.b1,
            ParamTensor::W2 => &self.w2,
            ParamTensor::B2 => &self.b2,
        }
    }

    pub fn tensor_mut(&mut self, t: ParamTensor) -> &mut [f32] {
        match t {
            ParamTensor::W1 => &mut self.w1,
            ParamTensor::B1 => &mut self.b1,
            ParamTensor::W2 => &mut self.w2,
            ParamTensor::B2 => &mut self.b2,
        }
    }
}

/// Two-layer softmax policy over a discrete action set.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyNetwork {
    l1: Dense,
    l2: Dense,
}

impl PolicyNetwork {
    /// Creates a policy with Glorot-initialised weights drawn from `rng`.
    pub fn new(state_size: usize, hidden_size: usize, num_actions: usize, rng: &mut impl RandomSource) -> Self {
        assert!(state_size > 0 && hidden_size > 0 && num_actions > 0, "policy dimensions must be non-zero");
        let l1 = Dense::xavier(state_size, hidden_size, rng);
        let l2 = Dense::xavier(hidden_size, num_actions, rng);
        Self { l1, l2 }
    }

    /// Builds a policy from explicit layers.
    #[must_use]
    pub fn from_layers(l1: Dense, l2: Dense) -> Self {
        assert_eq!(l1.out_dim, l2.in_dim, "hidden widths must agree");
        Self { l1, l2 }
    }

    /// Restores a policy from a parameter snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::ShapeMismatch`] if the snapshot is inconsistent.
    pub fn from_params(params: &PolicyParams) -> Result<Self, MlError> {
        params.check_shapes()?;
        Ok(Self {
            l1: Dense::new(params.w1.clone(), params.b1.clone(), params.state_size, params.hidden_size),
            l2: Dense::new(params.w2.clone(), params.b2.clone(), params.hidden_size, params.num_actions),
        })
    }

    #[must_use]
    pub fn state_size(&self) -> usize {
        self.l1.in_dim
    }

    #[must_use]
    pub fn hidden_size(&self) -> usize {
        self.l1.out_dim
    }

    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.l2.out_dim
    }

    #[must_use]
    pub fn input_layer(&self) -> &Dense {
        &self.l1
    }

    #[must_use]
    pub fn output_layer(&self) -> &Dense {
        &self.l2
    }

    #[must_use]
    pub fn param(&self, t: ParamTensor) -> &[f32] {
        match t {
            ParamTensor::W1 => &self.l1.w,
            ParamTensor::B1 => &self.l1.b,
            ParamTensor::W2 => &self.l2.w,
            ParamTensor::B2 => &self.l2.b,
        }
    }

    pub fn param_mut(&mut self, t: ParamTensor) -> &mut [f32] {
        match t {
            ParamTensor::W1 => &mut self.l1.w,
            ParamTensor::B1 => &mut self.l1.b,
            ParamTensor::W2 => &mut self.l2.w,
            ParamTensor::B2 => &mut self.l2.b,
        }
    }

    /// Allocates forward scratch sized for this network.
    #[must_use]
    pub fn new_activations(&self) -> Activations {
        Activations {
            hidden_pre: vec![0.0; self.hidden_size()],
            hidden: vec![0.0; self.hidden_size()],
            logits: vec![0.0; self.num_actions()],
            probs: vec![0.0; self.num_actions()],
        }
    }

    /// Allocates a zeroed gradient accumulator sized for this network.
    #[must_use]
    pub fn create_accumulator(&self) -> PolicyGrads {
        PolicyGrads {
            w1: vec![0.0; self.l1.w.len()],
            b1: vec![0.0; self.l1.b.len()],
            w2: vec![0.0; self.l2.w.len()],
            b2: vec![0.0; self.l2.b.len()],
            d_logits: vec![0.0; self.num_actions()],
            d_hidden: vec![0.0; self.hidden_size()],
        }
    }

    /// Action probabilities for `state`, as an owned vector.
    #[must_use]
    pub fn forward(&self, state: &[f32]) -> Vec<f32> {
        let mut activations = self.new_activations();
        let cache = self.forward_with_cache(state, &mut activations);
        cache.probs.iter().map(|&p| p as f32).collect()
    }

    /// Runs the forward pass into `activations` and returns views of every
    /// intermediate.
    pub fn forward_with_cache<'a>(&self, state: &[f32], activations: &'a mut Activations) -> ForwardCache<'a> {
        assert_eq!(state.len(), self.state_size(), "state vector has the wrong length");
        self.l1.forward_into(state, &mut activations.hidden_pre);
        relu_into(&activations.hidden_pre, &mut activations.hidden);
        self.l2.forward_into(&activations.hidden, &mut activations.logits);
        softmax_into(&activations.logits, &mut activations.probs);
        let activations: &'a Activations = activations;
        ForwardCache {
            hidden_pre: &activations.hidden_pre,
            hidden: &activations.hidden,
            logits: &activations.logits,
            probs: &activations.probs,
        }
    }

    /// Adds `∂(advantage · ln π(action | state)) / ∂θ` into `acc`.
    ///
    /// `cache` must come from [`Self::forward_with_cache`] on the same `state`
    /// with the current parameters.
    pub fn compute_gradients_into(
        &self,
        acc: &mut PolicyGrads,
        state: &[f32],
        action: usize,
        advantage: f32,
        cache: &ForwardCache<'_>,
    ) {
        assert!(action < self.num_actions(), "action index out of range");
        let advantage = f64::from(advantage.clamp(-ADVANTAGE_CLIP, ADVANTAGE_CLIP));

        // d ln softmax_a / d logit_j = 1{j == a} - p_j
        for (j, (d, &p)) in acc.d_logits.iter_mut().zip(cache.probs).enumerate() {
            let indicator = if j == action { 1.0 } else { 0.0 };
            *d = advantage * (indicator - p);
        }
        self.l2.accumulate_backward(cache.hidden, &acc.d_logits, &mut acc.w2, &mut acc.b2);

        for (h, d) in acc.d_hidden.iter_mut().enumerate() {
            *d = if cache.hidden_pre[h] > 0.0 {
                self.l2.input_grad(h, &acc.d_logits)
            } else {
                0.0
            };
        }
        self.l1.accumulate_backward(state, &acc.d_hidden, &mut acc.w1, &mut acc.b1);
    }

    /// Gradient ascent step: `θ += lr · acc`.
    pub fn apply_gradients(&mut self, acc: &PolicyGrads, lr: f32) {
        for t in ParamTensor::ALL {
            for (p, g) in self.param_mut(t).iter_mut().zip(acc.tensor(t)) {
                *p += lr * g;
            }
        }
    }

    /// Snapshot of the four tensors as flat row-major arrays.
    #[must_use]
    pub fn params(&self) -> PolicyParams {
        PolicyParams {
            state_size: self.state_size(),
            hidden_size: self.hidden_size(),
            num_actions: self.num_actions(),
            w1: self.l1.w.clone(),
            b1: self.l1.b.clone(),
            w2: self.l2.w.clone(),
            b2: self.l2.b.clone(),
        }
    }

    /// Overwrites the parameters from a snapshot of the same shape.
    ///
    /// # Errors
    ///
    /// Returns [`MlError::ShapeMismatch`] if the snapshot dimensions differ
    /// from this network's; the network is left untouched in that case.
    pub fn load_params(&mut self, params: &PolicyParams) -> Result<(), MlError> {
        params.check_shapes()?;
        if params.state_size != self.state_size()
            || params.hidden_size != self.hidden_size()
            || params.num_actions != self.num_actions()
        {
            return Err(MlError::ShapeMismatch("snapshot dimensions differ from the network"));
        }
        self.l1.w.copy_from_slice(&params.w1);
        self.l1.b.copy_from_slice(&params.b1);
        self.l2.w.copy_from_slice(&params.w2);
        self.l2.b.copy_from_slice(&params.b2);
        Ok(())
    }
}
