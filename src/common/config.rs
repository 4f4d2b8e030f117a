//! # Configuration Utilities
//!
//! TOML pipeline configuration and the generic loader used by the binary.
//!
//! A pipeline file names the input images, the ordered transform stages and
//! where results go:
//!
//! ```toml
//! [input]
//! image = "P3.bmp"
//! mask = "M.bmp"
//! keys = ["I_M.bmp"]
//!
//! [[stages]]
//! op = "xor"
//! key = 0
//! mask = { offset = 15, output = "M1.txt" }
//!
//! [output]
//! image = "I_D.bmp"
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::processing::pipeline::{Operation, TransformPipeline};

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: PipelineConfig = load_config("pipelines/challenge.toml")?;
/// ```
pub fn load_config<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete pipeline configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Images read before the pipeline starts
    pub input: InputConfig,
    /// Ordered transform stages
    #[serde(default)]
    pub stages: Vec<StageConfig>,
    /// Where the final image and verification report go
    #[serde(default)]
    pub output: OutputConfig,
    /// Worker pool settings
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Input image paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Image the stages are applied to
    pub image: PathBuf,
    /// Mask image, required as soon as any stage writes a checkpoint
    pub mask: Option<PathBuf>,
    /// XOR operand images, referenced by index from `xor` stages
    #[serde(default)]
    pub keys: Vec<PathBuf>,
}

/// One transform stage plus its optional side outputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageConfig {
    #[serde(flatten)]
    pub operation: Operation,
    /// Export the stage's output image to this path
    pub export: Option<PathBuf>,
    /// Write a masking file computed from the stage's output
    pub mask: Option<MaskCheckpoint>,
}

/// Masking file written after a stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskCheckpoint {
    /// Byte offset into the stage output where masking starts
    pub offset: usize,
    /// Text file receiving the offset and summed triples
    pub output: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Final transformed image
    pub image: Option<PathBuf>,
    /// JSON verification report of the last checkpoint
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Size of the transform worker pool; rayon's default when absent
    pub threads: Option<usize>,
}

impl PipelineConfig {
    /// The transform stages as an in-memory pipeline.
    pub fn pipeline(&self) -> TransformPipeline {
        TransformPipeline::new(self.stages.iter().map(|s| s.operation.clone()).collect())
    }

    /// Whether any stage writes a masking checkpoint.
    pub fn needs_mask(&self) -> bool {
        self.stages.iter().any(|s| s.mask.is_some())
    }
}
