//! Injectable randomness.
//!
//! Every stochastic call in the workspace (weight initialisation, action
//! sampling, bandit payouts, gradient-check sampling) draws from a
//! [`RandomSource`] passed in by the caller. Nothing reads process-wide
//! generator state, so a fixed seed reproduces a run bit for bit.

/// A source of uniform samples in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform sample in `[0, 1)`.
    fn next_f32(&mut self) -> f32;

    /// Uniform sample in `[low, high)`.
    fn uniform(&mut self, low: f32, high: f32) -> f32 {
        low + (high - low) * self.next_f32()
    }

    /// Uniform index in `[0, n)`. `n` must be non-zero.
    fn index(&mut self, n: usize) -> usize {
        // Truncation keeps the result below n for samples in [0, 1).
        ((self.next_f32() * n as f32) as usize).min(n - 1)
    }
}

impl RandomSource for fastrand::Rng {
    fn next_f32(&mut self) -> f32 {
        self.f32()
    }

    fn index(&mut self, n: usize) -> usize {
        self.usize(..n)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_f32(&mut self) -> f32 {
        (**self).next_f32()
    }

    fn index(&mut self, n: usize) -> usize {
        (**self).index(n)
    }
}

/// Seeded generator used wherever a caller does not inject its own.
#[must_use]
pub fn seeded(seed: u64) -> fastrand::Rng {
    fastrand::Rng::with_seed(seed)
}

/// Replays a fixed list of samples, cycling when exhausted.
///
/// Handy for pinning down categorical sampling in tests.
#[derive(Debug, Clone)]
pub struct FixedSequence {
    values: Vec<f32>,
    cursor: usize,
}

impl FixedSequence {
    #[must_use]
    pub fn new(values: Vec<f32>) -> Self {
        assert!(!values.is_empty(), "FixedSequence needs at least one value");
        Self { values, cursor: 0 }
    }
}

impl RandomSource for FixedSequence {
    fn next_f32(&mut self) -> f32 {
        let v = self.values[self.cursor];
        self.cursor = (self.cursor + 1) % self.values.len();
        v
    }
}
