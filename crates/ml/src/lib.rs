//! # ml
//!
//! Hand-written neural-network math for the policy-gradient engine: a dense
//! layer with explicit forward and backward passes, the two-layer softmax
//! policy built from it, the gradient accumulator it sums into, an injectable
//! random source, and a finite-difference gradient checker.
//!
//! There is no tape or graph here. The only differentiable function is the
//! REINFORCE objective of [`PolicyNetwork`], and its backward pass is derived
//! by hand in [`policy`].

pub mod error;
pub mod gradcheck;
pub mod nn;
pub mod params;
pub mod policy;
pub mod rng;

pub use error::MlError;
pub use gradcheck::{check_gradients, GradCheckReport, TensorCheck};
pub use nn::{entropy, Dense, LOG_EPS};
pub use params::PolicyParams;
pub use policy::{Activations, ForwardCache, ParamTensor, PolicyGrads, PolicyNetwork, ADVANTAGE_CLIP};
pub use rng::{seeded, FixedSequence, RandomSource};
