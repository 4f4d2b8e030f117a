//! # Pipeline Runner
//!
//! Drives a configured [`TransformPipeline`](crate::processing::TransformPipeline) end to end: loads the input, key
//! and mask images, runs the stages, and handles each stage's side outputs.
//!
//! ## Per-stage checkpoints
//!
//! A stage with a `mask` entry gets a masking file written from its output.
//! The file is then read back from disk and verified against the same output,
//! so a checkpoint is only trusted once its round trip through the text format
//! checks out.
//!
//! ## Failure policy
//!
//! - Image load, masking and verification precondition errors abort the run
//! - Image save errors are logged and counted; the run carries on
//! - Verification mismatches are recorded in the summary, never raised

use log::{error, info};
use std::path::Path;

use crate::common::config::PipelineConfig;
use crate::common::image_io;
use crate::common::pixels::PixelBuffer;
use crate::error::{Error, Result};
use crate::masking::codec;
use crate::masking::report::VerificationReport;
use crate::masking::verifier::MaskVerifier;

/// Verification result of one stage checkpoint.
#[derive(Debug, Clone)]
pub struct CheckpointReport {
    pub stage: usize,
    pub report: VerificationReport,
}

/// What a pipeline run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// Output of the last stage
    pub output: PixelBuffer,
    /// One entry per stage that wrote a masking file
    pub checkpoints: Vec<CheckpointReport>,
    /// Number of images that could not be saved
    pub failed_saves: usize,
}

impl RunSummary {
    /// True when every save succeeded and every checkpoint verified cleanly.
    pub fn succeeded(&self) -> bool {
        self.failed_saves == 0 && self.checkpoints.iter().all(|c| c.report.all_matched)
    }
}

/// Runs the pipeline described by a [`PipelineConfig`].
pub struct PipelineRunner {
    config: PipelineConfig,
}

impl PipelineRunner {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Execute the pipeline.
    ///
    /// # Errors
    /// - [`Error::ImageLoad`] if an input, key or mask image cannot be read
    /// - [`Error::MissingMask`] if a checkpoint needs a mask and none is configured
    /// - Any transform, masking or mask-file I/O error from a stage
    pub fn run(&self) -> Result<RunSummary> {
        let input = image_io::load(&self.config.input.image)?;
        info!(
            "📷 Loaded input '{}' ({}x{})",
            self.config.input.image.display(),
            input.width(),
            input.height()
        );

        let keys = self
            .config
            .input
            .keys
            .iter()
            .map(image_io::load)
            .collect::<Result<Vec<_>>>()?;

        let verifier = match &self.config.input.mask {
            Some(path) => Some(MaskVerifier::new(image_io::load(path)?)),
            None if self.config.needs_mask() => return Err(Error::MissingMask),
            None => None,
        };

        let mut checkpoints = Vec::new();
        let mut failed_saves = 0;

        let pipeline = self.config.pipeline();
        let output = pipeline.run_with(&input, &keys, |stage, _, out| {
            let stage_config = &self.config.stages[stage];

            if let Some(path) = &stage_config.export {
                if !save_reported(path, out) {
                    failed_saves += 1;
                }
            }

            if let (Some(checkpoint), Some(verifier)) = (&stage_config.mask, &verifier) {
                let report = write_checkpoint(verifier, out, checkpoint.offset, &checkpoint.output)?;
                checkpoints.push(CheckpointReport { stage, report });
            }

            Ok(())
        })?;

        if let Some(path) = &self.config.output.image {
            if !save_reported(path, &output) {
                failed_saves += 1;
            }
        }

        if let (Some(path), Some(last)) = (&self.config.output.report, checkpoints.last()) {
            last.report.export_to_json(path)?;
            info!("📊 Verification report written to '{}'", path.display());
        }

        let summary = RunSummary {
            output,
            checkpoints,
            failed_saves,
        };

        if summary.succeeded() {
            info!("✅ Pipeline finished ({} stages)", pipeline.len());
        } else {
            error!(
                "❌ Pipeline finished with {} failed save(s) and {} mismatching checkpoint(s)",
                summary.failed_saves,
                summary.checkpoints.iter().filter(|c| !c.report.all_matched).count()
            );
        }

        Ok(summary)
    }
}

/// Mask `transformed`, write the masking file, then read it back and verify.
pub fn write_checkpoint(
    verifier: &MaskVerifier,
    transformed: &PixelBuffer,
    offset: usize,
    path: &Path,
) -> Result<VerificationReport> {
    let mask_file = verifier.apply_mask(transformed, offset)?;
    codec::write_mask_file(path, &mask_file)?;

    let reloaded = codec::read_mask_file(path)?;
    verifier.verify_file(transformed, &reloaded)
}

fn save_reported(path: &Path, pixels: &PixelBuffer) -> bool {
    // image_io::save already logs the failure
    image_io::save(path, pixels).is_ok()
}
