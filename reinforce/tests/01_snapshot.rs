use std::path::PathBuf;

use ml::{seeded, PolicyNetwork};
use reinforce::snapshot;

fn scratch(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("reinforce-{}-{name}", std::process::id()))
}

fn trained_params() -> ml::PolicyParams {
    PolicyNetwork::new(5, 7, 3, &mut seeded(21)).params()
}

#[test]
fn json_snapshot_round_trips() {
    let path = scratch("policy.json");
    let params = trained_params();
    snapshot::save(&path, &params).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"hidden_size\": 7"));
    assert_eq!(snapshot::load(&path).unwrap(), params);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn raw_snapshot_round_trips() {
    let path = scratch("policy.bin");
    let params = trained_params();
    snapshot::save(&path, &params).unwrap();
    let bytes = std::fs::metadata(&path).unwrap().len();
    assert_eq!(bytes, 12 + 4 * (5 * 7 + 7 + 7 * 3 + 3));
    assert_eq!(snapshot::load(&path).unwrap(), params);
    std::fs::remove_file(path).unwrap();
}

#[test]
fn truncated_raw_snapshot_is_rejected() {
    let path = scratch("short.bin");
    let mut blob = Vec::new();
    trained_params().write_raw(&mut blob).unwrap();
    blob.truncate(blob.len() - 4);
    std::fs::write(&path, &blob).unwrap();
    assert!(snapshot::load(&path).is_err());
    std::fs::remove_file(path).unwrap();
}

#[test]
fn inconsistent_json_snapshot_is_rejected() {
    let path = scratch("bad.json");
    let mut params = trained_params();
    params.b2.pop();
    std::fs::write(&path, serde_json::to_string(&params).unwrap()).unwrap();
    assert!(snapshot::load(&path).is_err());
    std::fs::remove_file(path).unwrap();
}

#[test]
fn missing_file_names_the_path() {
    let err = snapshot::load(&scratch("missing.json")).unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn summary_describes_the_network() {
    let summary = snapshot::summarize(&trained_params()).unwrap();
    assert_eq!((summary.state_size, summary.hidden_size, summary.num_actions), (5, 7, 3));
    let names: Vec<_> = summary.tensors.iter().map(|t| t.tensor).collect();
    assert_eq!(names, ["w1", "b1", "w2", "b2"]);
    assert_eq!(summary.tensors[0].len, 35);
    // biases start at zero, so an all-zero state gives a uniform policy
    assert_eq!(summary.tensors[1].max_abs, 0.0);
    for p in &summary.zero_state_probs {
        assert!((p - 1.0 / 3.0).abs() < 1e-6);
    }
}

/// Accepts nothing; every write fails.
struct FullDisk;

impl std::io::Write for FullDisk {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::Other, "no space left on device"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn buffered_write_failure_is_reported() {
    let params = trained_params();
    // The buffer holds the whole JSON document, so the failure only shows up on flush.
    let json = snapshot::write_to(std::io::BufWriter::with_capacity(1 << 20, FullDisk), &params, true);
    assert!(json.is_err());
    let raw = snapshot::write_to(std::io::BufWriter::with_capacity(1 << 20, FullDisk), &params, false);
    assert!(raw.is_err());

    let mut sink = Vec::new();
    snapshot::write_to(&mut sink, &params, true).unwrap();
    assert_eq!(serde_json::from_slice::<ml::PolicyParams>(&sink).unwrap(), params);
}
