//! Return-to-go and advantage math for one rollout.

/// Added to the standard deviation before dividing.
pub const NORMALIZE_EPS: f32 = 1e-8;

/// Discounted return-to-go for every timestep, written into `out`.
///
/// The recursion runs backwards and restarts at every `done` step before
/// that step's reward is added, so no return crosses an episode boundary
/// inside the rollout. A trailing unfinished episode is truncated at the end
/// of the rollout.
pub fn discounted_returns_into(rewards: &[f32], dones: &[bool], gamma: f32, out: &mut [f32]) {
    assert_eq!(rewards.len(), dones.len());
    assert!(out.len() >= rewards.len());
    let mut running = 0.0f32;
    for t in (0..rewards.len()).rev() {
        if dones[t] {
            running = 0.0;
        }
        running = rewards[t] + gamma * running;
        out[t] = running;
    }
}

/// Arithmetic mean; `0.0` for an empty slice.
#[must_use]
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    (values.iter().map(|&v| f64::from(v)).sum::<f64>() / values.len() as f64) as f32
}

/// Z-scores `values` into `out` using the population standard deviation.
///
/// Returns the `(mean, std)` that were removed.
pub fn normalize_into(values: &[f32], out: &mut [f32]) -> (f32, f32) {
    assert!(out.len() >= values.len());
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let var = values.iter().map(|&v| (f64::from(v) - mean).powi(2)).sum::<f64>() / n;
    let std = var.sqrt();
    let denom = std + f64::from(NORMALIZE_EPS);
    for (o, &v) in out.iter_mut().zip(values) {
        *o = ((f64::from(v) - mean) / denom) as f32;
    }
    (mean as f32, std as f32)
}
