//! # pixmask Binary Entry Point
//!
//! Thin command-line wrapper around the `pixmask` library.
//!
//! ## Usage
//!
//! ```bash
//! # Single transforms
//! pixmask transform --input I_O.bmp --output P1.bmp --op xor --key I_M.bmp
//! pixmask transform --input P1.bmp --output P2.bmp --op rotate-right --bits 3
//!
//! # Masking file from a transformed image, then check an image against it
//! pixmask mask --transformed P2.bmp --mask M.bmp --offset 15 --output M1.txt
//! pixmask verify --actual P2.bmp --mask M.bmp --masking M1.txt --report report.json
//!
//! # Random key image
//! pixmask keygen --width 640 --height 480 --output I_M.bmp --seed 7
//!
//! # Full pipeline from a TOML file
//! pixmask run --config pipeline.toml
//! ```
//!
//! The exit status is non-zero when any image fails to load or save, or when a
//! verification finds mismatching pixels.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Builder;
use log::{info, LevelFilter};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pixmask::common::config::{load_config, PipelineConfig};
use pixmask::masking::codec;
use pixmask::processing::{keygen, transform, Direction};
use pixmask::{image_io, MaskVerifier, PipelineRunner, PixelBuffer};

/// Command-line arguments for the pixmask binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log debug details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Worker threads for buffer transforms (overrides the pipeline file)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply one byte-level transform to an image
    Transform {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long, value_enum)]
        op: OpArg,

        /// Bits to shift or rotate (0-8)
        #[arg(long, default_value_t = 0)]
        bits: u32,

        /// Key image for `xor`
        #[arg(long)]
        key: Option<PathBuf>,
    },

    /// Write the masking file of a transformed image
    Mask {
        #[arg(long)]
        transformed: PathBuf,

        #[arg(long)]
        mask: PathBuf,

        /// Byte offset into the transformed image
        #[arg(long)]
        offset: usize,

        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check an image against a masking file
    Verify {
        #[arg(long)]
        actual: PathBuf,

        #[arg(long)]
        mask: PathBuf,

        /// Masking text file (offset + RGB sums)
        #[arg(long)]
        masking: PathBuf,

        /// Write the verification report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Generate a random key image
    Keygen {
        #[arg(long)]
        width: u32,

        #[arg(long)]
        height: u32,

        #[arg(short, long)]
        output: PathBuf,

        /// Seed for a reproducible key
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Run a full pipeline described by a TOML file
    Run {
        /// Path to the pipeline configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OpArg {
    Xor,
    ShiftLeft,
    ShiftRight,
    RotateLeft,
    RotateRight,
}

/// Initialize the logging system with timestamp, level, and message formatting.
///
/// Format: `[HH:MM:SS] [LEVEL] message`
fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] {}",
                chrono::Local::now().format("%H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter_level(level)
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    init_logger(args.verbose);

    if let Some(threads) = args.threads {
        transform::configure_workers(threads);
    }

    match args.command {
        Command::Transform {
            input,
            output,
            op,
            bits,
            key,
        } => run_transform(&input, &output, op, bits, key.as_deref()),
        Command::Mask {
            transformed,
            mask,
            offset,
            output,
        } => run_mask(&transformed, &mask, offset, &output),
        Command::Verify {
            actual,
            mask,
            masking,
            report,
        } => run_verify(&actual, &mask, &masking, report.as_deref()),
        Command::Keygen {
            width,
            height,
            output,
            seed,
        } => {
            let key = keygen::random_key(width, height, seed)?;
            Ok(save_or_fail(&output, &key))
        }
        Command::Run { config } => run_pipeline(&config, args.threads.is_some()),
    }
}

fn run_transform(input: &Path, output: &Path, op: OpArg, bits: u32, key: Option<&Path>) -> anyhow::Result<ExitCode> {
    let pixels = image_io::load(input)?;

    let result = match op {
        OpArg::Xor => {
            let Some(key) = key else {
                bail!("--key is required for xor");
            };
            transform::xor_buffers(&pixels, &image_io::load(key)?)?
        }
        OpArg::ShiftLeft => transform::shift_buffer(&pixels, bits, Direction::Left)?,
        OpArg::ShiftRight => transform::shift_buffer(&pixels, bits, Direction::Right)?,
        OpArg::RotateLeft => transform::rotate_buffer(&pixels, bits, Direction::Left)?,
        OpArg::RotateRight => transform::rotate_buffer(&pixels, bits, Direction::Right)?,
    };

    Ok(save_or_fail(output, &result))
}

fn run_mask(transformed: &Path, mask: &Path, offset: usize, output: &Path) -> anyhow::Result<ExitCode> {
    let transformed = image_io::load(transformed)?;
    let verifier = MaskVerifier::new(image_io::load(mask)?);

    let mask_file = verifier.apply_mask(&transformed, offset)?;
    codec::write_mask_file(output, &mask_file)
        .with_context(|| format!("writing masking file '{}'", output.display()))?;

    Ok(ExitCode::SUCCESS)
}

fn run_verify(actual: &Path, mask: &Path, masking: &Path, report_path: Option<&Path>) -> anyhow::Result<ExitCode> {
    let actual = image_io::load(actual)?;
    let verifier = MaskVerifier::new(image_io::load(mask)?);
    let mask_file = codec::read_mask_file(masking)
        .with_context(|| format!("reading masking file '{}'", masking.display()))?;

    let report = verifier.verify_file(&actual, &mask_file)?;
    for mismatch in &report.mismatches {
        info!(
            "  pixel {}: expected {:?}, got {:?}",
            mismatch.pixel, mismatch.expected, mismatch.actual
        );
    }

    if let Some(path) = report_path {
        report.export_to_json(path)?;
        println!("Report exported to: {}", path.display());
    }

    Ok(if report.all_matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_pipeline(config_path: &Path, threads_overridden: bool) -> anyhow::Result<ExitCode> {
    let config: PipelineConfig = load_config(config_path)
        .with_context(|| format!("loading pipeline '{}'", config_path.display()))?;

    if let (false, Some(threads)) = (threads_overridden, config.runtime.threads) {
        transform::configure_workers(threads);
    }

    let summary = PipelineRunner::new(config).run()?;

    Ok(if summary.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn save_or_fail(path: &Path, pixels: &PixelBuffer) -> ExitCode {
    // image_io::save logs the failure
    match image_io::save(path, pixels) {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
