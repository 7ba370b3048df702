//! Parameter snapshot files.
//!
//! A path ending in `.json` holds the serde form of [`PolicyParams`]; any
//! other path holds the raw native-endian blob written by
//! [`PolicyParams::write_raw`].

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use ml::{ParamTensor, PolicyNetwork, PolicyParams};
use serde::Serialize;

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Writes `params` to `path` in the format its extension selects.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn save(path: &Path, params: &PolicyParams) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_to(BufWriter::new(file), params, is_json(path))
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::info!(path = %path.display(), "saved policy parameters");
    Ok(())
}

/// Writes `params` as pretty JSON or as the raw blob, then flushes `out` so
/// buffered write errors are reported.
///
/// # Errors
///
/// Returns any serialisation or write error, including one raised by the
/// final flush.
pub fn write_to<W: Write>(mut out: W, params: &PolicyParams, json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut out, params)?;
        out.flush()?;
    } else {
        params.write_raw(&mut out)?;
    }
    Ok(())
}

/// Reads a snapshot from `path` and checks its tensor shapes.
///
/// # Errors
///
/// Returns an error if the file is missing, truncated or inconsistent.
pub fn load(path: &Path) -> Result<PolicyParams> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let input = BufReader::new(file);
    let params = if is_json(path) {
        let params: PolicyParams = serde_json::from_reader(input)?;
        params.check_shapes()?;
        params
    } else {
        PolicyParams::read_raw(input)?
    };
    Ok(params)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TensorSummary {
    pub tensor: &'static str,
    pub len: usize,
    pub mean: f64,
    pub max_abs: f32,
}

/// What `reinforce inspect` prints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotSummary {
    pub state_size: usize,
    pub hidden_size: usize,
    pub num_actions: usize,
    pub tensors: Vec<TensorSummary>,
    /// Action distribution for an all-zero state.
    pub zero_state_probs: Vec<f32>,
}

/// Rebuilds the network from `params` and summarises it.
///
/// # Errors
///
/// Returns an error if the tensor shapes disagree with the dimensions.
pub fn summarize(params: &PolicyParams) -> Result<SnapshotSummary> {
    let policy = PolicyNetwork::from_params(params)?;
    let tensors = ParamTensor::ALL
        .iter()
        .map(|&t| {
            let values = policy.param(t);
            let sum: f64 = values.iter().map(|&v| f64::from(v)).sum();
            TensorSummary {
                tensor: t.name(),
                len: values.len(),
                mean: if values.is_empty() { 0.0 } else { sum / values.len() as f64 },
                max_abs: values.iter().fold(0.0f32, |m, v| m.max(v.abs())),
            }
        })
        .collect();
    Ok(SnapshotSummary {
        state_size: policy.state_size(),
        hidden_size: policy.hidden_size(),
        num_actions: policy.num_actions(),
        tensors,
        zero_state_probs: policy.forward(&vec![0.0; policy.state_size()]),
    })
}
