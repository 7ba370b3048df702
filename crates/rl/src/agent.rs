//! # Training Core
//!
//! [`ReinforceAgent`] owns the policy, the rollout buffer and every scratch
//! array the update needs. After construction nothing on the
//! act/observe/train path allocates.
//!
//! ## Update rule
//!
//! [`ReinforceAgent::train`] turns one full rollout into exactly one
//! parameter update:
//!
//! 1. discounted returns, restarting at every `done` flag;
//! 2. advantages, z-scored across the rollout when `normalize_returns` is set;
//! 3. per-transition gradients of `advantage · ln π(a | s)` summed into a
//!    single accumulator, all against the same parameter snapshot;
//! 4. the sum divided by the rollout length and applied once.
//!
//! Applying per-sample updates instead would scale the step by the rollout
//! length and evaluate later samples against already-shifted weights.

use ml::{entropy, PolicyGrads, PolicyNetwork, RandomSource, LOG_EPS};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::buffer::RolloutBuffer;
use crate::config::TrainerConfig;
use crate::error::RlError;
use crate::returns::{discounted_returns_into, mean, normalize_into};

/// A sampled action and its log-probability at selection time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionSample {
    pub action: usize,
    pub log_prob: f32,
}

/// Diagnostics from one call to [`ReinforceAgent::train`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TrainStats {
    /// Mean discounted return before normalisation.
    pub avg_raw_return: f32,
    /// Mean per-step entropy of the action distribution.
    pub entropy: f32,
    /// Updates applied so far, including this one.
    pub train_steps: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BufferStatus {
    pub length: usize,
    pub capacity: usize,
}

/// REINFORCE learner over a discrete action space.
pub struct ReinforceAgent<R: RandomSource = fastrand::Rng> {
    config: TrainerConfig,
    policy: PolicyNetwork,
    activations: ml::Activations,
    grads: PolicyGrads,
    buffer: RolloutBuffer,
    returns: Vec<f32>,
    advantages: Vec<f32>,
    rng: R,
    train_steps: u64,
}

impl ReinforceAgent<fastrand::Rng> {
    /// Builds an agent whose generator is seeded from `config.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] if the config fails validation.
    pub fn new(config: TrainerConfig) -> Result<Self, RlError> {
        let rng = ml::seeded(config.seed);
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> ReinforceAgent<R> {
    /// Builds an agent around an injected generator. Weight initialisation
    /// draws from `rng` first, then action sampling continues from it.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] if the config fails validation.
    pub fn with_rng(config: TrainerConfig, mut rng: R) -> Result<Self, RlError> {
        config.validate()?;
        let policy = PolicyNetwork::new(config.state_size, config.hidden_size, config.num_actions, &mut rng);
        Self::with_policy(config, policy, rng)
    }

    /// Builds an agent around an existing policy, e.g. one restored from a
    /// parameter snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] if the config fails validation or
    /// its dimensions disagree with `policy`.
    pub fn with_policy(config: TrainerConfig, policy: PolicyNetwork, rng: R) -> Result<Self, RlError> {
        config.validate()?;
        if policy.state_size() != config.state_size
            || policy.hidden_size() != config.hidden_size
            || policy.num_actions() != config.num_actions
        {
            return Err(RlError::InvalidConfig(format!(
                "policy is {}x{}x{} but config asks for {}x{}x{}",
                policy.state_size(),
                policy.hidden_size(),
                policy.num_actions(),
                config.state_size,
                config.hidden_size,
                config.num_actions,
            )));
        }
        let activations = policy.new_activations();
        let grads = policy.create_accumulator();
        let buffer = RolloutBuffer::new(config.rollout_size, config.state_size);
        debug!(
            state_size = config.state_size,
            hidden_size = config.hidden_size,
            num_actions = config.num_actions,
            rollout_size = config.rollout_size,
            "agent initialised"
        );
        Ok(Self {
            returns: vec![0.0; config.rollout_size],
            advantages: vec![0.0; config.rollout_size],
            config,
            policy,
            activations,
            grads,
            buffer,
            rng,
            train_steps: 0,
        })
    }

    fn check_state(&self, state: &[f32]) -> Result<(), RlError> {
        if state.len() == self.config.state_size {
            Ok(())
        } else {
            Err(RlError::StateSize { expected: self.config.state_size, got: state.len() })
        }
    }

    /// Samples an action from the current policy.
    ///
    /// One uniform draw walks the cumulative distribution; the first action
    /// whose cumulative mass exceeds it is chosen. If rounding leaves the
    /// total below the draw the last action is taken.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::StateSize`] for a state of the wrong length.
    pub fn act(&mut self, state: &[f32]) -> Result<ActionSample, RlError> {
        self.check_state(state)?;
        let cache = self.policy.forward_with_cache(state, &mut self.activations);
        let draw = f64::from(self.rng.next_f32());

        let mut action = cache.probs.len() - 1;
        let mut cumulative = 0.0;
        for (i, &p) in cache.probs.iter().enumerate() {
            cumulative += p;
            if cumulative > draw {
                action = i;
                break;
            }
        }
        let log_prob = (cache.probs[action] + LOG_EPS).ln() as f32;
        Ok(ActionSample { action, log_prob })
    }

    /// Stores one transition.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::BufferFull`] if the rollout is already full. That
    /// only happens when a caller skips [`Self::train`] after
    /// [`Self::should_train`] turned true, so it is treated as a bug rather
    /// than dropped silently. Wrong-length states and out-of-range actions
    /// are rejected as well.
    pub fn observe(
        &mut self,
        state: &[f32],
        action: usize,
        reward: f32,
        done: bool,
        log_prob: f32,
    ) -> Result<(), RlError> {
        self.check_state(state)?;
        if action >= self.config.num_actions {
            return Err(RlError::ActionOutOfRange { index: action, num_actions: self.config.num_actions });
        }
        if !self.buffer.push(state, action, reward, log_prob, done) {
            error!(capacity = self.buffer.capacity(), "observe called on a full rollout buffer");
            return Err(RlError::BufferFull { capacity: self.buffer.capacity() });
        }
        Ok(())
    }

    #[must_use]
    pub fn should_train(&self) -> bool {
        self.buffer.is_full()
    }

    /// Runs one policy-gradient update over the buffered rollout and clears
    /// the buffer. An empty buffer is left alone.
    pub fn train(&mut self) -> TrainStats {
        let n = self.buffer.len();
        if n == 0 {
            warn!("train called with an empty rollout buffer");
            return TrainStats { avg_raw_return: 0.0, entropy: 0.0, train_steps: self.train_steps };
        }

        let returns = &mut self.returns[..n];
        discounted_returns_into(self.buffer.rewards(), self.buffer.dones(), self.config.gamma, returns);
        let avg_raw_return = mean(returns);

        let advantages = &mut self.advantages[..n];
        if self.config.normalize_returns {
            normalize_into(&self.returns[..n], advantages);
        } else {
            advantages.copy_from_slice(&self.returns[..n]);
        }

        self.grads.zero();
        let mut entropy_sum = 0.0f64;
        for t in 0..n {
            let state = self.buffer.state(t);
            let cache = self.policy.forward_with_cache(state, &mut self.activations);
            entropy_sum += entropy(cache.probs);
            self.policy
                .compute_gradients_into(&mut self.grads, state, self.buffer.actions()[t], self.advantages[t], &cache);
        }

        self.grads.scale(1.0 / n as f32);
        self.policy.apply_gradients(&self.grads, self.config.learning_rate);

        self.buffer.clear();
        self.train_steps += 1;
        let stats = TrainStats {
            avg_raw_return,
            entropy: (entropy_sum / n as f64) as f32,
            train_steps: self.train_steps,
        };
        info!(
            train_steps = stats.train_steps,
            avg_raw_return = stats.avg_raw_return,
            entropy = stats.entropy,
            transitions = n,
            "policy updated"
        );
        stats
    }

    /// Current action distribution for `state`. No side effects on training.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::StateSize`] for a state of the wrong length.
    pub fn get_probs(&self, state: &[f32]) -> Result<Vec<f32>, RlError> {
        self.check_state(state)?;
        Ok(self.policy.forward(state))
    }

    #[must_use]
    pub fn buffer_status(&self) -> BufferStatus {
        BufferStatus { length: self.buffer.len(), capacity: self.buffer.capacity() }
    }

    #[must_use]
    pub fn buffer(&self) -> &RolloutBuffer {
        &self.buffer
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    #[must_use]
    pub fn policy(&self) -> &PolicyNetwork {
        &self.policy
    }

    /// Mutable access for restoring parameters. Shapes are fixed, so the
    /// scratch arrays stay valid.
    pub fn policy_mut(&mut self) -> &mut PolicyNetwork {
        &mut self.policy
    }

    #[must_use]
    pub fn train_steps(&self) -> u64 {
        self.train_steps
    }
}
