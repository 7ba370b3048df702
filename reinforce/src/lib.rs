//! # reinforce
//!
//! Documentation entry point and command-line front end for a small
//! on-policy REINFORCE learner.
//!
//! ## The Crates
//!
//! -   **[`ml`]:** the two-layer softmax policy network with a hand-written
//!     backward pass, parameter snapshots, seeded randomness and the
//!     finite-difference gradient checker.
//! -   **[`rl`]:** the training core. A fixed-size rollout buffer, discounted
//!     and normalised returns, the [`rl::ReinforceAgent`], the
//!     [`rl::Environment`] trait and the [`rl::Runner`] that drives any
//!     environment through one canonical step sequence.
//! -   **`reinforce`:** this crate. The `reinforce` binary runs the offline
//!     validation harness (`gradcheck`, `bandit`) and inspects saved
//!     parameter snapshots (`inspect`).
//!
//! ## Getting Started
//!
//! ```text
//! reinforce gradcheck --seed 7
//! reinforce bandit --steps 10000 --save-params policy.json
//! reinforce inspect --params policy.json
//! ```
//!
//! Pass `--verbose` to log every environment step.

pub mod snapshot;

pub use ml;
pub use rl;
