use serde::{Deserialize, Serialize};

use crate::error::RlError;

/// Construction parameters for [`crate::ReinforceAgent`].
///
/// Missing JSON fields fall back to the defaults, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Length of the encoded state vector.
    pub state_size: usize,
    /// Number of discrete actions.
    pub num_actions: usize,
    /// Width of the hidden layer.
    pub hidden_size: usize,
    /// Transitions collected per update.
    pub rollout_size: usize,
    pub learning_rate: f32,
    /// Discount factor.
    pub gamma: f32,
    /// Z-score returns before using them as advantages.
    pub normalize_returns: bool,
    /// Seed for the generator built by [`crate::ReinforceAgent::new`].
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            state_size: 16,
            num_actions: 6,
            hidden_size: 64,
            rollout_size: 128,
            learning_rate: 0.001,
            gamma: 0.99,
            normalize_returns: true,
            seed: 0,
        }
    }
}

impl TrainerConfig {
    /// Parses a JSON config.
    ///
    /// # Errors
    ///
    /// Returns [`RlError::ConfigParse`] on malformed JSON and
    /// [`RlError::InvalidConfig`] if the values fail [`Self::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, RlError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`RlError::InvalidConfig`] describing the first bad field.
    pub fn validate(&self) -> Result<(), RlError> {
        let fail = |msg: &str| Err(RlError::InvalidConfig(msg.to_owned()));
        if self.state_size == 0 {
            return fail("state_size must be positive");
        }
        if self.num_actions == 0 {
            return fail("num_actions must be positive");
        }
        if self.hidden_size == 0 {
            return fail("hidden_size must be positive");
        }
        if self.rollout_size == 0 {
            return fail("rollout_size must be positive");
        }
        if !self.learning_rate.is_finite() || self.learning_rate < 0.0 {
            return fail("learning_rate must be finite and non-negative");
        }
        if !(0.0..=1.0).contains(&self.gamma) {
            return fail("gamma must lie in [0, 1]");
        }
        Ok(())
    }

    #[must_use]
    pub fn with_state_size(mut self, state_size: usize) -> Self {
        self.state_size = state_size;
        self
    }

    #[must_use]
    pub fn with_num_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = num_actions;
        self
    }

    #[must_use]
    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    #[must_use]
    pub fn with_rollout_size(mut self, rollout_size: usize) -> Self {
        self.rollout_size = rollout_size;
        self
    }

    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f32) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    #[must_use]
    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    #[must_use]
    pub fn with_normalize_returns(mut self, normalize: bool) -> Self {
        self.normalize_returns = normalize;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}
