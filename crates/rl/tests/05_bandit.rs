use ml::FixedSequence;
use rl::{BanditEnv, Environment, BUTTONS};

#[test]
fn standard_arms_favour_b() {
    let env = BanditEnv::new(1);
    assert_eq!(env.payout_probs(), &[0.0, 0.0, 0.0, 0.0, 0.2, 0.8]);
    assert_eq!(env.best_action(), 5);
    assert_eq!(BUTTONS[env.best_action()], "b");
    assert_eq!(<BanditEnv as Environment>::ACTIONS, &BUTTONS);
}

#[test]
fn payout_compares_draw_against_arm_probability() {
    let mut env = BanditEnv::with_rng(FixedSequence::new(vec![0.5]));
    let prev = env.get_state().unwrap();

    env.execute_action("b").unwrap();
    let paid = env.get_state().unwrap();
    let signal = env.reward_fn(&prev, &paid);
    assert_eq!(signal.total, 1.0);
    assert_eq!(signal.breakdown, vec![("arm_b".to_owned(), 1.0)]);
    assert_eq!(signal.fired_tests, vec!["payout".to_owned()]);

    env.execute_action("a").unwrap();
    let unpaid = env.get_state().unwrap();
    let signal = env.reward_fn(&paid, &unpaid);
    assert_eq!(signal.total, 0.0);
    assert!(signal.fired_tests.is_empty());
    assert_eq!(unpaid.pulls, 2);
}

#[test]
fn movement_buttons_never_pay() {
    let mut env = BanditEnv::new(3);
    for label in ["up", "down", "left", "right"] {
        for _ in 0..50 {
            env.execute_action(label).unwrap();
            assert_eq!(env.get_state().unwrap().last_payout, 0.0);
        }
    }
}

#[test]
fn every_step_ends_the_episode() {
    let mut env = BanditEnv::new(3);
    let prev = env.get_state().unwrap();
    env.execute_action("b").unwrap();
    let curr = env.get_state().unwrap();
    assert!(env.check_done(&prev, &curr));

    env.reset_env().unwrap();
    let after = env.get_state().unwrap();
    assert_eq!(after.last_action, None);
    assert_eq!(after.pulls, 1);
}

#[test]
fn encoding_is_constant() {
    let env = BanditEnv::new(0);
    let mut out = [0.0f32; 5];
    let state = rl::BanditState { pulls: 9, last_action: Some(2), last_payout: 0.0 };
    env.encode_state_into(&state, &mut out);
    assert_eq!(out, [1.0; 5]);
}

#[test]
fn payout_rate_tracks_probability() {
    let mut env = BanditEnv::with_payouts([0.0, 0.0, 0.0, 0.0, 0.0, 0.25], ml::seeded(8));
    let mut paid = 0;
    for _ in 0..4000 {
        env.execute_action("b").unwrap();
        if env.get_state().unwrap().last_payout > 0.0 {
            paid += 1;
        }
    }
    let rate = paid as f32 / 4000.0;
    assert!((rate - 0.25).abs() < 0.03, "rate {rate}");
}
