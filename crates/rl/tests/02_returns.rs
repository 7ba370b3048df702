use rl::returns::{discounted_returns_into, mean, normalize_into};

#[test]
fn discounted_sum_without_boundaries() {
    let rewards = [1.0, 0.0, 2.0];
    let dones = [false, false, false];
    let mut out = [0.0; 3];
    discounted_returns_into(&rewards, &dones, 0.5, &mut out);
    // G2 = 2, G1 = 0 + 0.5*2, G0 = 1 + 0.5*1
    assert_eq!(out, [1.5, 1.0, 2.0]);
}

#[test]
fn returns_do_not_cross_episode_boundaries() {
    let rewards = [1.0, 1.0, 5.0, 1.0];
    let dones = [false, true, false, false];
    let mut out = [0.0; 4];
    discounted_returns_into(&rewards, &dones, 1.0, &mut out);
    // The reward after the boundary never leaks into the first episode.
    assert_eq!(out, [2.0, 1.0, 6.0, 1.0]);
}

#[test]
fn episode_boundary_isolates_both_sides() {
    let dones = [false, false, true, false, false, true];
    let run = |rewards: [f32; 6]| {
        let mut out = [0.0; 6];
        discounted_returns_into(&rewards, &dones, 0.9, &mut out);
        out
    };

    // Changing rewards up to the boundary leaves later returns alone.
    let a = run([1.0, 2.0, 3.0, 0.5, -1.0, 2.0]);
    let b = run([-7.0, 40.0, 0.25, 0.5, -1.0, 2.0]);
    assert_eq!(a[3..], b[3..]);
    assert_ne!(a[..3], b[..3]);

    // Changing rewards after the boundary leaves earlier returns alone.
    let c = run([1.0, 2.0, 3.0, 9.0, 9.0, 9.0]);
    assert_eq!(a[..3], c[..3]);
    assert_ne!(a[3..], c[3..]);
}

#[test]
fn every_step_terminal_gives_raw_rewards() {
    let rewards = [0.3, 0.0, 1.0, 0.7];
    let dones = [true; 4];
    let mut out = [0.0; 4];
    discounted_returns_into(&rewards, &dones, 0.99, &mut out);
    assert_eq!(out, rewards);
}

#[test]
fn gamma_zero_keeps_immediate_reward() {
    let rewards = [1.0, 2.0, 3.0];
    let mut out = [0.0; 3];
    discounted_returns_into(&rewards, &[false; 3], 0.0, &mut out);
    assert_eq!(out, rewards);
}

#[test]
fn normalized_values_have_zero_mean_unit_std() {
    let values = [1.0, 2.0, 3.0, 4.0, 10.0];
    let mut out = [0.0; 5];
    let (m, s) = normalize_into(&values, &mut out);
    assert!((m - 4.0).abs() < 1e-6);
    assert!((s - 10.0f32.sqrt()).abs() < 1e-5);

    let out_mean = out.iter().sum::<f32>() / 5.0;
    let out_var = out.iter().map(|v| (v - out_mean).powi(2)).sum::<f32>() / 5.0;
    assert!(out_mean.abs() < 1e-6);
    assert!((out_var.sqrt() - 1.0).abs() < 1e-5);
}

#[test]
fn constant_values_normalize_to_zero() {
    let values = [2.5; 6];
    let mut out = [1.0; 6];
    let (_, s) = normalize_into(&values, &mut out);
    assert_eq!(s, 0.0);
    assert!(out.iter().all(|&v| v == 0.0));
}

#[test]
fn mean_of_empty_is_zero() {
    assert_eq!(mean(&[]), 0.0);
    assert!((mean(&[1.0, 2.0]) - 1.5).abs() < 1e-7);
}
