//! Safetensors I/O around the engine.
//!
//! Reader: loads the two condition tensors a caller exported from their
//! epoching pipeline. Writer: persists a search result for downstream
//! plotting and reporting layers.
use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use ndarray::{ArrayD, IxDyn};

use crate::search::ClusterSearchResult;

// ── Low-level safetensors parser (no dependency on the `safetensors`
//    crate's tensor types — we just need raw bytes → ndarray). ───────────

fn parse_header(bytes: &[u8]) -> Result<(HashMap<String, serde_json::Value>, usize)> {
    if bytes.len() < 8 {
        bail!("safetensors file too small");
    }
    let n = u64::from_le_bytes(bytes[..8].try_into().unwrap()) as usize;
    let header: HashMap<String, serde_json::Value> = serde_json::from_slice(&bytes[8..8 + n])
        .context("failed to parse safetensors header")?;
    Ok((header, 8 + n))
}

fn shape_of(entry: &serde_json::Value) -> Result<Vec<usize>> {
    entry["shape"]
        .as_array()
        .context("tensor entry has no shape")?
        .iter()
        .map(|v| v.as_u64().map(|u| u as usize).context("bad shape entry"))
        .collect()
}

/// Read one F32 or F64 tensor as f64 values.
fn read_tensor_f64(bytes: &[u8], data_start: usize, entry: &serde_json::Value) -> Result<Vec<f64>> {
    let offsets = entry["data_offsets"]
        .as_array()
        .context("tensor entry has no data_offsets")?;
    let s = offsets[0].as_u64().context("bad offset")? as usize;
    let e = offsets[1].as_u64().context("bad offset")? as usize;
    let raw = &bytes[data_start + s..data_start + e];

    let dtype = entry["dtype"].as_str().unwrap_or("");
    let vals = match dtype {
        "F32" => raw
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes(b.try_into().unwrap()) as f64)
            .collect(),
        "F64" => raw
            .chunks_exact(8)
            .map(|b| f64::from_le_bytes(b.try_into().unwrap()))
            .collect(),
        other => bail!("unsupported dtype {other:?} (want F32 or F64)"),
    };
    Ok(vals)
}

/// Load the two condition tensors `names` from a safetensors file.
///
/// Each tensor must be 2-D (samples, trials) or 3-D
/// (samples, channels, trials), F32 or F64; values come back as f64.
pub fn load_conditions(path: &Path, names: &[String; 2]) -> Result<[ArrayD<f64>; 2]> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading conditions from {}", path.display()))?;
    let (header, data_start) = parse_header(&bytes)?;

    let mut out = Vec::with_capacity(2);
    for name in names {
        let entry = header
            .get(name)
            .with_context(|| format!("missing tensor {name:?}"))?;
        let shape = shape_of(entry)?;
        let vals = read_tensor_f64(&bytes, data_start, entry)
            .with_context(|| format!("reading tensor {name:?}"))?;
        out.push(
            ArrayD::from_shape_vec(IxDyn(&shape), vals)
                .with_context(|| format!("tensor {name:?}: shape/data mismatch"))?,
        );
    }
    let b = out.pop().unwrap();
    let a = out.pop().unwrap();
    Ok([a, b])
}

// ── Generic safetensors builder ───────────────────────────────────────────

/// Minimal safetensors writer for F64 and I32 tensors.
pub struct StWriter {
    entries: Vec<(String, Vec<u8>, &'static str, Vec<usize>)>,
}

impl Default for StWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl StWriter {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add_f64(&mut self, name: &str, data: &[f64], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries
            .push((name.to_string(), bytes, "F64", shape.to_vec()));
    }

    pub fn add_i32(&mut self, name: &str, data: &[i32], shape: &[usize]) {
        let bytes: Vec<u8> = data.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.entries
            .push((name.to_string(), bytes, "I32", shape.to_vec()));
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        use std::io::Write;
        let mut header_map = serde_json::Map::new();
        let mut offset: usize = 0;
        for (name, data, dtype, shape) in &self.entries {
            header_map.insert(
                name.clone(),
                serde_json::json!({
                    "dtype": dtype,
                    "shape": shape,
                    "data_offsets": [offset, offset + data.len()],
                }),
            );
            offset += data.len();
        }
        let hdr_bytes = serde_json::to_vec(&header_map)?;
        let pad = (8 - hdr_bytes.len() % 8) % 8;
        let padded: Vec<u8> = hdr_bytes
            .into_iter()
            .chain(std::iter::repeat(b' ').take(pad))
            .collect();
        let mut f = std::fs::File::create(path)?;
        f.write_all(&(padded.len() as u64).to_le_bytes())?;
        f.write_all(&padded)?;
        for (_, data, _, _) in &self.entries {
            f.write_all(data)?;
        }
        Ok(())
    }
}

// ── Result writer ─────────────────────────────────────────────────────────

/// Write a search result to `result.safetensors` for plotting layers.
///
/// Tensors: `statistic` (input shape minus the trial axis),
/// `null_distribution` [N], `cluster_bounds` [K, 2] (start, end — end
/// exclusive), `cluster_channel` [K], `cluster_mass` [K], `p_values` [K],
/// `significant` [K] (0/1).
pub fn write_result(result: &ClusterSearchResult, path: &Path) -> Result<()> {
    let k = result.clusters.len();

    let mut bounds = Vec::with_capacity(2 * k);
    let mut channels = Vec::with_capacity(k);
    for c in &result.clusters {
        bounds.push(c.start as i32);
        bounds.push(c.end as i32);
        channels.push(c.channel as i32);
    }
    let flags: Vec<i32> = result.significant.iter().map(|&s| s as i32).collect();

    let stat_flat: Vec<f64> = result.statistic.iter().copied().collect();

    let mut w = StWriter::new();
    w.add_f64("statistic", &stat_flat, result.statistic.shape());
    w.add_f64(
        "null_distribution",
        &result.null_distribution,
        &[result.null_distribution.len()],
    );
    w.add_i32("cluster_bounds", &bounds, &[k, 2]);
    w.add_i32("cluster_channel", &channels, &[k]);
    w.add_f64("cluster_mass", &result.masses(), &[k]);
    w.add_f64("p_values", &result.p_values, &[k]);
    w.add_i32("significant", &flags, &[k]);
    w.write(path)
        .with_context(|| format!("writing result to {}", path.display()))
}
