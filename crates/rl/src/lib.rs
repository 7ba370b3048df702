//! # REINFORCE Training
//!
//! On-policy policy-gradient learning over a discrete action space.
//!
//! - [`agent`]: the [`ReinforceAgent`] that samples actions, records a
//!   rollout and applies one batched update per full rollout.
//! - [`env`]: the [`Environment`] trait, the only coupling to a world.
//! - [`runner`]: the canonical step sequence tying the two together.
//! - [`bandit`] and [`validation`]: a synthetic environment plus offline
//!   checks (finite-difference gradients, bandit convergence).
//!
//! The network itself lives in the [`ml`] crate.

pub mod agent;
pub mod bandit;
pub mod buffer;
pub mod config;
pub mod env;
pub mod error;
pub mod returns;
pub mod runner;
pub mod validation;

pub use agent::{ActionSample, BufferStatus, ReinforceAgent, TrainStats};
pub use bandit::{BanditEnv, BanditState, BUTTONS};
pub use buffer::RolloutBuffer;
pub use config::TrainerConfig;
pub use env::{Environment, RewardSignal};
pub use error::RlError;
pub use runner::{Runner, StepReport};
pub use validation::{
    run_bandit_test, run_gradient_check, train_bandit, BanditConfig, BanditReport, GradCheckConfig,
};
