//! # Canonical Runner
//!
//! [`Runner::step`] is the only place a transition is wired together:
//!
//! ```text
//! get_state s → encode s → act → execute_action → get_state s'
//!   → reward_fn(s, s') → check_done(s, s') → observe
//!   → reset_env if done → train if the rollout is full
//! ```
//!
//! Every environment goes through this sequence, so the bandit used for
//! validation and a live game adapter see identical learning semantics.
//! `step` takes `&mut self`; the shared feature buffer and rollout buffer can
//! never be touched by two steps at once.

use ml::RandomSource;
use serde::Serialize;
use tracing::debug;

use crate::agent::{ReinforceAgent, TrainStats};
use crate::env::Environment;
use crate::error::RlError;

/// Everything a presentation layer needs about one step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub action: usize,
    pub action_label: &'static str,
    pub reward: f32,
    pub reward_breakdown: Vec<(String, f32)>,
    pub fired_tests: Vec<String>,
    pub done: bool,
    /// Set when this step completed a rollout and triggered an update.
    pub training: Option<TrainStats>,
}

fn env_error<E: std::error::Error + Send + Sync + 'static>(err: E) -> RlError {
    RlError::Environment(Box::new(err))
}

/// Drives an [`Environment`] with a [`ReinforceAgent`].
pub struct Runner<E: Environment, R: RandomSource = fastrand::Rng> {
    env: E,
    agent: ReinforceAgent<R>,
    features: Vec<f32>,
    steps: u64,
}

impl<E: Environment, R: RandomSource> Runner<E, R> {
    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] if the environment's action list
    /// does not match the agent's action count.
    pub fn new(env: E, agent: ReinforceAgent<R>) -> Result<Self, RlError> {
        if E::ACTIONS.len() != agent.config().num_actions {
            return Err(RlError::InvalidConfig(format!(
                "environment exposes {} actions but the agent was built for {}",
                E::ACTIONS.len(),
                agent.config().num_actions
            )));
        }
        let features = vec![0.0; agent.config().state_size];
        Ok(Self { env, agent, features, steps: 0 })
    }

    /// Runs one full transition.
    ///
    /// # Errors
    ///
    /// Propagates environment failures as [`RlError::Environment`] and any
    /// error raised by the agent. Any failure before `observe` leaves the
    /// rollout buffer untouched. A failed `reset_env` is reported only after
    /// the stored transition is counted and a full rollout has been trained,
    /// so the next step starts from an empty buffer.
    pub fn step(&mut self) -> Result<StepReport, RlError> {
        let prev = self.env.get_state().map_err(env_error)?;
        self.env.encode_state_into(&prev, &mut self.features);

        let sample = self.agent.act(&self.features)?;
        let action_label = E::ACTIONS[sample.action];
        self.env.execute_action(action_label).map_err(env_error)?;

        let curr = self.env.get_state().map_err(env_error)?;
        let reward = self.env.reward_fn(&prev, &curr);
        let done = self.env.check_done(&prev, &curr);

        self.agent
            .observe(&self.features, sample.action, reward.total, done, sample.log_prob)?;

        let reset = if done { self.env.reset_env().map_err(env_error) } else { Ok(()) };

        // The transition is stored; a full rollout trains even if the reset failed.
        let training = if self.agent.should_train() { Some(self.agent.train()) } else { None };
        self.steps += 1;
        debug!(step = self.steps, action = action_label, reward = reward.total, done, "step");
        reset?;

        Ok(StepReport {
            action: sample.action,
            action_label,
            reward: reward.total,
            reward_breakdown: reward.breakdown,
            fired_tests: reward.fired_tests,
            done,
            training,
        })
    }

    /// Calls [`Self::step`] `steps` times and returns the statistics of the
    /// last update, if any happened.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first step error.
    pub fn run(&mut self, steps: usize) -> Result<Option<TrainStats>, RlError> {
        let mut last = None;
        for _ in 0..steps {
            if let Some(stats) = self.step()?.training {
                last = Some(stats);
            }
        }
        Ok(last)
    }

    /// Steps completed so far.
    #[must_use]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    #[must_use]
    pub fn agent(&self) -> &ReinforceAgent<R> {
        &self.agent
    }

    pub fn agent_mut(&mut self) -> &mut ReinforceAgent<R> {
        &mut self.agent
    }

    /// Hands the environment and agent back to the caller.
    pub fn into_parts(self) -> (E, ReinforceAgent<R>) {
        (self.env, self.agent)
    }
}
