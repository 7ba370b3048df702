//! # Validation Harness
//!
//! Offline checks for the learning pipeline:
//!
//! - [`run_gradient_check`] compares the analytic policy gradient with
//!   central finite differences.
//! - [`run_bandit_test`] trains the real [`ReinforceAgent`] through the real
//!   [`Runner`] on a [`BanditEnv`] and checks that the best arm wins.
//!
//! Both report pass/fail with the measured numbers instead of returning
//! errors.

use ml::{check_gradients, GradCheckReport, PolicyNetwork, RandomSource};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::agent::{ReinforceAgent, TrainStats};
use crate::bandit::{BanditEnv, BUTTONS};
use crate::config::TrainerConfig;
use crate::env::Environment;
use crate::error::RlError;
use crate::runner::Runner;

/// Settings for [`run_gradient_check`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradCheckConfig {
    pub seed: u64,
    pub state_size: usize,
    pub hidden_size: usize,
    pub num_actions: usize,
    /// Indices probed per parameter tensor.
    pub samples_per_tensor: usize,
}

impl Default for GradCheckConfig {
    fn default() -> Self {
        let trainer = TrainerConfig::default();
        Self {
            seed: 42,
            state_size: trainer.state_size,
            hidden_size: trainer.hidden_size,
            num_actions: trainer.num_actions,
            samples_per_tensor: 32,
        }
    }
}

/// Builds a random policy, state, action and advantage from `config.seed`
/// and checks the policy gradient at that point.
#[must_use]
pub fn run_gradient_check(config: &GradCheckConfig) -> GradCheckReport {
    let mut rng = ml::seeded(config.seed);
    let policy = PolicyNetwork::new(config.state_size, config.hidden_size, config.num_actions, &mut rng);
    let state: Vec<f32> = (0..config.state_size).map(|_| rng.uniform(-1.0, 1.0)).collect();
    let action = rng.index(config.num_actions);
    let advantage = rng.uniform(-2.0, 2.0);

    let report = check_gradients(&policy, &state, action, advantage, config.samples_per_tensor, &mut rng);
    info!(
        passed = report.passed,
        max_relative_error = report.max_relative_error,
        threshold = report.threshold,
        "gradient check finished"
    );
    report
}

/// Settings for [`run_bandit_test`].
///
/// The trainer fields are flat so a partial JSON file overrides only what it
/// names. The state width is unused by the bandit and kept at the trainer
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanditConfig {
    /// Environment steps to run.
    pub steps: usize,
    /// Probability the best arm must reach.
    pub threshold: f32,
    /// Seed for the agent's generator.
    pub seed: u64,
    /// Seed for the bandit's payout generator.
    pub env_seed: u64,
    pub hidden_size: usize,
    pub rollout_size: usize,
    pub learning_rate: f32,
    pub gamma: f32,
    pub normalize_returns: bool,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            steps: 10_000,
            threshold: 0.70,
            seed: 42,
            env_seed: 7,
            hidden_size: 64,
            rollout_size: 128,
            learning_rate: 0.02,
            gamma: 1.0,
            normalize_returns: false,
        }
    }
}

impl BanditConfig {
    /// Parses a JSON config; omitted fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::ConfigParse`] on malformed JSON and
    /// [`RlError::InvalidConfig`] on invalid trainer settings.
    pub fn from_json_str(json: &str) -> Result<Self, RlError> {
        let config: Self = serde_json::from_str(json)?;
        config.trainer().validate()?;
        Ok(config)
    }

    /// Trainer settings for a bandit agent.
    #[must_use]
    pub fn trainer(&self) -> TrainerConfig {
        TrainerConfig::default()
            .with_num_actions(BUTTONS.len())
            .with_hidden_size(self.hidden_size)
            .with_rollout_size(self.rollout_size)
            .with_learning_rate(self.learning_rate)
            .with_gamma(self.gamma)
            .with_normalize_returns(self.normalize_returns)
            .with_seed(self.seed)
    }
}

/// Outcome of a bandit run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BanditReport {
    pub passed: bool,
    pub best_action: usize,
    pub best_action_label: &'static str,
    pub best_action_prob: f32,
    pub threshold: f32,
    pub steps: u64,
    pub train_steps: u64,
    pub final_probs: Vec<f32>,
    pub last_stats: Option<TrainStats>,
}

/// Trains on the standard bandit and returns the report together with the
/// trained agent.
///
/// # Errors
///
/// Returns [`RlError::InvalidConfig`] for an unusable trainer config.
pub fn train_bandit(config: &BanditConfig) -> Result<(BanditReport, ReinforceAgent), RlError> {
    let env = BanditEnv::new(config.env_seed);
    let agent = ReinforceAgent::new(config.trainer())?;
    let mut runner = Runner::new(env, agent)?;
    let last_stats = runner.run(config.steps)?;
    let steps = runner.steps();
    let (mut env, agent) = runner.into_parts();

    let mut features = vec![0.0f32; agent.config().state_size];
    let state = env.get_state().map_err(|e| RlError::Environment(Box::new(e)))?;
    env.encode_state_into(&state, &mut features);
    let final_probs = agent.get_probs(&features)?;

    let best_action = env.best_action();
    let best_action_prob = final_probs[best_action];
    let report = BanditReport {
        passed: best_action_prob > config.threshold,
        best_action,
        best_action_label: BUTTONS[best_action],
        best_action_prob,
        threshold: config.threshold,
        steps,
        train_steps: agent.train_steps(),
        final_probs,
        last_stats,
    };
    info!(
        passed = report.passed,
        best_action = report.best_action_label,
        best_action_prob = report.best_action_prob,
        train_steps = report.train_steps,
        "bandit run finished"
    );
    Ok((report, agent))
}

/// [`train_bandit`] without the agent.
///
/// # Errors
///
/// Returns [`RlError::InvalidConfig`] for an unusable trainer config.
pub fn run_bandit_test(config: &BanditConfig) -> Result<BanditReport, RlError> {
    train_bandit(config).map(|(report, _)| report)
}
