//! Synthetic multi-armed bandit used to validate the training pipeline.

use std::convert::Infallible;

use ml::RandomSource;
use serde::{Deserialize, Serialize};

use crate::env::{Environment, RewardSignal};

/// Joypad buttons, in action-index order.
pub const BUTTONS: [&str; 6] = ["up", "down", "left", "right", "a", "b"];

/// Stateless bandit. Every step is terminal, so a step's return equals its
/// reward. Each arm pays `1.0` with its own probability and `0.0` otherwise.
pub struct BanditEnv<R: RandomSource = fastrand::Rng> {
    payout_probs: [f32; 6],
    rng: R,
    pulls: u64,
    last_action: Option<usize>,
    last_payout: f32,
}

/// Snapshot returned by [`BanditEnv::get_state`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BanditState {
    pub pulls: u64,
    pub last_action: Option<usize>,
    pub last_payout: f32,
}

impl BanditEnv<fastrand::Rng> {
    /// The standard arms: `b` pays with probability 0.8, `a` with 0.2 and the
    /// movement buttons never pay.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_rng(ml::seeded(seed))
    }
}

impl<R: RandomSource> BanditEnv<R> {
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self::with_payouts([0.0, 0.0, 0.0, 0.0, 0.2, 0.8], rng)
    }

    #[must_use]
    pub fn with_payouts(payout_probs: [f32; 6], rng: R) -> Self {
        Self { payout_probs, rng, pulls: 0, last_action: None, last_payout: 0.0 }
    }

    #[must_use]
    pub fn payout_probs(&self) -> &[f32; 6] {
        &self.payout_probs
    }

    /// Index of the arm with the highest payout probability.
    #[must_use]
    pub fn best_action(&self) -> usize {
        self.payout_probs
            .iter()
            .enumerate()
            .fold((0, f32::NEG_INFINITY), |best, (i, &p)| if p > best.1 { (i, p) } else { best })
            .0
    }

    #[must_use]
    pub fn pulls(&self) -> u64 {
        self.pulls
    }
}

impl<R: RandomSource> Environment for BanditEnv<R> {
    type State = BanditState;
    type Error = Infallible;

    const ACTIONS: &'static [&'static str] = &BUTTONS;

    fn get_state(&mut self) -> Result<BanditState, Infallible> {
        Ok(BanditState { pulls: self.pulls, last_action: self.last_action, last_payout: self.last_payout })
    }

    // No state to encode; a constant input keeps every layer trainable.
    fn encode_state_into(&self, _state: &BanditState, out: &mut [f32]) {
        out.fill(1.0);
    }

    fn execute_action(&mut self, label: &str) -> Result<(), Infallible> {
        let action = BUTTONS.iter().position(|&b| b == label);
        let payout = match action {
            Some(i) if self.rng.next_f32() < self.payout_probs[i] => 1.0,
            _ => 0.0,
        };
        self.pulls += 1;
        self.last_action = action;
        self.last_payout = payout;
        Ok(())
    }

    fn reward_fn(&self, _prev: &BanditState, curr: &BanditState) -> RewardSignal {
        let mut signal = RewardSignal::scalar(curr.last_payout);
        if let Some(i) = curr.last_action {
            signal.breakdown.push((format!("arm_{}", BUTTONS[i]), curr.last_payout));
            if curr.last_payout > 0.0 {
                signal.fired_tests.push("payout".to_owned());
            }
        }
        signal
    }

    fn check_done(&self, _prev: &BanditState, _curr: &BanditState) -> bool {
        true
    }

    fn reset_env(&mut self) -> Result<(), Infallible> {
        self.last_action = None;
        self.last_payout = 0.0;
        Ok(())
    }
}
