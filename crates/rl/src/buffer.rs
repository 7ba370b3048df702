//! Fixed-capacity rollout storage.
//!
//! Everything is allocated once in [`RolloutBuffer::new`]. States live in a
//! single flat `capacity × state_size` array and the per-step scalars in
//! parallel arrays; [`RolloutBuffer::clear`] only rewinds the cursor, and the
//! next fill overwrites the stale entries in place.

/// Flat storage for one batch of transitions.
#[derive(Debug, Clone)]
pub struct RolloutBuffer {
    state_size: usize,
    capacity: usize,
    len: usize,
    states: Vec<f32>,
    actions: Vec<usize>,
    rewards: Vec<f32>,
    log_probs: Vec<f32>,
    dones: Vec<bool>,
}

impl RolloutBuffer {
    #[must_use]
    pub fn new(capacity: usize, state_size: usize) -> Self {
        Self {
            state_size,
            capacity,
            len: 0,
            states: vec![0.0; capacity * state_size],
            actions: vec![0; capacity],
            rewards: vec![0.0; capacity],
            log_probs: vec![0.0; capacity],
            dones: vec![false; capacity],
        }
    }

    /// Copies one transition in. Returns `false` without touching anything
    /// when the buffer is full or `state` has the wrong length.
    pub fn push(&mut self, state: &[f32], action: usize, reward: f32, log_prob: f32, done: bool) -> bool {
        if self.is_full() || state.len() != self.state_size {
            return false;
        }
        let t = self.len;
        let offset = self.state_offset(t);
        self.states[offset..offset + self.state_size].copy_from_slice(state);
        self.actions[t] = action;
        self.rewards[t] = reward;
        self.log_probs[t] = log_prob;
        self.dones[t] = done;
        self.len += 1;
        true
    }

    /// Rewinds the cursor. Memory is neither freed nor zeroed.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.len >= self.capacity
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn state_size(&self) -> usize {
        self.state_size
    }

    /// Index of timestep `t`'s first state element in the flat store.
    #[must_use]
    pub fn state_offset(&self, t: usize) -> usize {
        t * self.state_size
    }

    /// Zero-copy view of the state stored at timestep `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t` is not below [`Self::len`].
    #[must_use]
    pub fn state(&self, t: usize) -> &[f32] {
        assert!(t < self.len, "timestep {t} is past the end of the rollout ({})", self.len);
        let offset = self.state_offset(t);
        &self.states[offset..offset + self.state_size]
    }

    #[must_use]
    pub fn actions(&self) -> &[usize] {
        &self.actions[..self.len]
    }

    #[must_use]
    pub fn rewards(&self) -> &[f32] {
        &self.rewards[..self.len]
    }

    #[must_use]
    pub fn log_probs(&self) -> &[f32] {
        &self.log_probs[..self.len]
    }

    #[must_use]
    pub fn dones(&self) -> &[bool] {
        &self.dones[..self.len]
    }
}
