use serde::Serialize;

/// Outcome of judging one transition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RewardSignal {
    /// Scalar reward stored with the transition.
    pub total: f32,
    /// Named components that add up to `total`, for display.
    pub breakdown: Vec<(String, f32)>,
    /// Names of the reward conditions that fired.
    pub fired_tests: Vec<String>,
}

impl RewardSignal {
    /// A reward with no breakdown.
    #[must_use]
    pub fn scalar(total: f32) -> Self {
        Self { total, breakdown: Vec::new(), fired_tests: Vec::new() }
    }
}

/// Reinforcement learning environment trait.
///
/// This is the whole coupling between the learner and a world. A live game
/// adapter and the synthetic [`crate::bandit::BanditEnv`] both implement it,
/// and [`crate::runner::Runner`] drives either one through the same
/// sequence of calls.
///
/// [`execute_action`] and [`reset_env`] may block until the world has
/// caught up; the runner never issues another call while one is pending.
///
/// [`execute_action`]: Environment::execute_action
/// [`reset_env`]: Environment::reset_env
pub trait Environment {
    /// Opaque world state captured before and after each action.
    type State;
    /// Failure raised by the world itself.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Action labels. Position in this list is the action index the policy
    /// samples.
    const ACTIONS: &'static [&'static str];

    /// Captures the current world state.
    fn get_state(&mut self) -> Result<Self::State, Self::Error>;

    /// Writes the fixed-length feature encoding of `state` into `out`.
    fn encode_state_into(&self, state: &Self::State, out: &mut [f32]);

    /// Applies one action, returning once its effect is observable.
    fn execute_action(&mut self, label: &str) -> Result<(), Self::Error>;

    /// Judges the transition `prev → curr`.
    fn reward_fn(&self, prev: &Self::State, curr: &Self::State) -> RewardSignal;

    /// Whether `curr` ends the episode.
    fn check_done(&self, prev: &Self::State, curr: &Self::State) -> bool;

    /// Restores a startable world, returning once it is ready.
    fn reset_env(&mut self) -> Result<(), Self::Error>;
}
