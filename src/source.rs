//! Composable condition sources.
//!
//! The statistics engine is a pure function over arrays; anything able
//! to produce the two condition arrays can feed it. File-backed
//! providers (memory-mapped recordings, epoch extractors) live behind
//! this trait in their own crates and compose with the engine instead of
//! inheriting from it.
use std::path::PathBuf;

use anyhow::Result;
use ndarray::ArrayD;

/// Capability: yields the two condition arrays, shaped
/// (samples, trials) or (samples, channels, trials).
///
/// Implementations may hit the filesystem, so the method is fallible;
/// shape validation stays with the engine.
pub trait ConditionSource {
    fn conditions(&self) -> Result<Vec<ArrayD<f64>>>;
}

/// A plain in-memory pair.
impl ConditionSource for [ArrayD<f64>; 2] {
    fn conditions(&self) -> Result<Vec<ArrayD<f64>>> {
        Ok(self.to_vec())
    }
}

/// Two named tensors in a safetensors file, as exported by an epoching
/// pipeline.
#[derive(Debug, Clone)]
pub struct ConditionFile {
    pub path: PathBuf,
    /// Tensor names of condition A and condition B.
    pub names: [String; 2],
}

impl ConditionSource for ConditionFile {
    fn conditions(&self) -> Result<Vec<ArrayD<f64>>> {
        let [a, b] = crate::io::load_conditions(&self.path, &self.names)?;
        Ok(vec![a, b])
    }
}
