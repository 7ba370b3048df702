use ml::nn::{entropy, log_softmax_at, relu_into, softmax_into, Dense};
use ml::seeded;

fn close(a: &[f64], b: &[f64]) -> bool {
    a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-6)
}

#[test]
fn dense_forward_matches_hand_computation() {
    let dense = Dense::new(vec![1.0, 2.0, -3.0, 0.5], vec![0.1, -0.2], 2, 2);
    let mut y = [0.0f64; 2];
    dense.forward_into(&[0.5f32, -1.0], &mut y);
    let expected = [0.1 + 0.5 - 2.0, -0.2 - 1.5 - 0.5];
    assert!(close(&y, &expected), "{y:?}");
}

#[test]
fn dense_backward_gradients() {
    let dense = Dense::new(vec![1.0, 2.0, -3.0, 0.5], vec![0.1, -0.2], 2, 2);
    let x = [0.5f32, -1.0];
    let grad_out = [1.0f64, -2.0];
    let mut dw = vec![0.0f32; 4];
    let mut db = vec![0.0f32; 2];
    dense.accumulate_backward(&x, &grad_out, &mut dw, &mut db);
    assert_eq!(dw, vec![0.5 * 1.0, -1.0 * 1.0, 0.5 * -2.0, -1.0 * -2.0]);
    assert_eq!(db, vec![1.0, -2.0]);

    let dx: Vec<f64> = (0..2).map(|i| dense.input_grad(i, &grad_out)).collect();
    assert!(close(&dx, &[1.0 * 1.0 + -3.0 * -2.0, 2.0 * 1.0 + 0.5 * -2.0]));
}

#[test]
fn dense_backward_adds_instead_of_overwriting() {
    let dense = Dense::new(vec![1.0, 2.0, -3.0, 0.5], vec![0.1, -0.2], 2, 2);
    let x = [0.5f32, -1.0];
    let grad_out = [1.0f64, -2.0];
    let mut dw = vec![0.0f32; 4];
    let mut db = vec![0.0f32; 2];
    dense.accumulate_backward(&x, &grad_out, &mut dw, &mut db);
    dense.accumulate_backward(&x, &grad_out, &mut dw, &mut db);
    assert_eq!(dw, vec![1.0, -2.0, -2.0, 4.0]);
    assert_eq!(db, vec![2.0, -4.0]);
}

#[test]
fn xavier_weights_stay_in_range_and_biases_start_at_zero() {
    let mut rng = seeded(7);
    let dense = Dense::xavier(16, 64, &mut rng);
    let limit = (6.0f32 / 80.0).sqrt();
    assert_eq!(dense.w.len(), 16 * 64);
    assert!(dense.w.iter().all(|w| w.abs() <= limit));
    assert!(dense.b.iter().all(|&b| b == 0.0));
    // not degenerate
    assert!(dense.w.iter().any(|&w| w > limit / 2.0));
    assert!(dense.w.iter().any(|&w| w < -limit / 2.0));
}

#[test]
fn relu_clamps_negatives() {
    let mut y = [0.0f64; 3];
    relu_into(&[-1.0, 0.0, 2.0], &mut y);
    assert_eq!(y, [0.0, 0.0, 2.0]);
}

#[test]
fn softmax_matches_direct_formula() {
    let logits = [1.0f64, 2.0, 3.0];
    let mut probs = [0.0f64; 3];
    softmax_into(&logits, &mut probs);
    let exp: Vec<f64> = logits.iter().map(|l| l.exp()).collect();
    let sum: f64 = exp.iter().sum();
    let expected: Vec<f64> = exp.iter().map(|e| e / sum).collect();
    assert!(close(&probs, &expected));
    assert!((log_softmax_at(&logits, 2) - expected[2].ln()).abs() < 1e-12);
}

#[test]
fn softmax_survives_large_logits() {
    let mut probs = [0.0f64; 2];
    softmax_into(&[1000.0, 999.0], &mut probs);
    assert!(probs.iter().all(|p| p.is_finite()));
    assert!((probs[0] + probs[1] - 1.0).abs() < 1e-12);
}

#[test]
fn entropy_of_uniform_and_one_hot() {
    let uniform = [0.25f64; 4];
    assert!((entropy(&uniform) - 4.0f64.ln()).abs() < 1e-6);
    let one_hot = [0.0, 1.0, 0.0, 0.0];
    assert!(entropy(&one_hot).abs() < 1e-6);
}
