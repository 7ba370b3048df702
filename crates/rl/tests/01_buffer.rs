use rl::RolloutBuffer;

fn filled(capacity: usize) -> RolloutBuffer {
    let mut buffer = RolloutBuffer::new(capacity, 3);
    for t in 0..capacity {
        let x = t as f32;
        assert!(buffer.push(&[x, x + 0.5, -x], t % 2, x * 10.0, -x, t == capacity - 1));
    }
    buffer
}

#[test]
fn push_fills_to_capacity() {
    let mut buffer = RolloutBuffer::new(2, 3);
    assert!(buffer.is_empty());
    assert!(!buffer.is_full());
    assert!(buffer.push(&[1.0, 2.0, 3.0], 1, 0.5, -0.1, false));
    assert_eq!(buffer.len(), 1);
    assert!(buffer.push(&[4.0, 5.0, 6.0], 0, 1.5, -0.2, true));
    assert!(buffer.is_full());
    assert_eq!(buffer.capacity(), 2);
    assert_eq!(buffer.state_size(), 3);
}

#[test]
fn push_on_full_buffer_changes_nothing() {
    let mut buffer = filled(3);
    let before = buffer.clone();
    assert!(!buffer.push(&[9.0, 9.0, 9.0], 1, 99.0, 0.0, false));
    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.rewards(), before.rewards());
    assert_eq!(buffer.state(2), before.state(2));
}

#[test]
fn push_rejects_wrong_state_length() {
    let mut buffer = RolloutBuffer::new(4, 3);
    assert!(!buffer.push(&[1.0, 2.0], 0, 1.0, 0.0, false));
    assert!(buffer.is_empty());
}

#[test]
fn states_are_laid_out_row_major() {
    let buffer = filled(4);
    for t in 0..4 {
        assert_eq!(buffer.state_offset(t), t * 3);
        let x = t as f32;
        assert_eq!(buffer.state(t), &[x, x + 0.5, -x]);
    }
    assert_eq!(buffer.actions(), &[0, 1, 0, 1]);
    assert_eq!(buffer.rewards(), &[0.0, 10.0, 20.0, 30.0]);
    assert_eq!(buffer.log_probs(), &[0.0, -1.0, -2.0, -3.0]);
    assert_eq!(buffer.dones(), &[false, false, false, true]);
}

#[test]
fn clear_rewinds_and_hides_stale_entries() {
    let mut buffer = filled(4);
    buffer.clear();
    assert!(buffer.is_empty());
    assert!(!buffer.is_full());
    assert!(buffer.rewards().is_empty());

    assert!(buffer.push(&[7.0, 7.0, 7.0], 1, 3.0, -0.5, true));
    assert_eq!(buffer.len(), 1);
    assert_eq!(buffer.state(0), &[7.0, 7.0, 7.0]);
    assert_eq!(buffer.rewards(), &[3.0]);
    assert_eq!(buffer.dones(), &[true]);
}

#[test]
#[should_panic]
fn state_past_len_panics() {
    let mut buffer = filled(2);
    buffer.clear();
    let _ = buffer.state(0);
}
