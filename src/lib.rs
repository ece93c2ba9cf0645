//! widerface: a reader for WIDER FACE ground-truth annotation files.
//!
//! The WIDER FACE face detection benchmark distributes its labels as plain
//! text: an image path, a box count, then one line per face box with its
//! geometry and six quality attributes. This crate loads such files, looks
//! up the boxes of individual images, and summarizes or cross-checks whole
//! files against the images on disk.
//!
//! # Modules
//!
//! - [`wider`]: Box records, attribute codes and the annotation index
//! - [`stats`]: Whole-file statistics
//! - [`check`]: Cross-checking images against their annotations
//! - [`inputs`]: Expansion of file/directory arguments
//! - [`error`]: Error types for widerface operations

pub mod check;
pub mod error;
pub mod inputs;
pub mod stats;
pub mod wider;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use error::WiderError;

use wider::{
    AnnotationIndex, BBoxRecord, Blur, Expression, Illumination, Occlusion, Pose, Validity,
};

/// Above this many queried images the suffix lookup table is built
/// automatically.
const LOOKUP_TABLE_THRESHOLD: usize = 16;

/// The widerface CLI application.
#[derive(Parser)]
#[command(name = "widerface")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Print the face boxes recorded for images.
    Boxes(BoxesArgs),
    /// List every image in an annotation file with its box count.
    List(ListArgs),
    /// Show statistics for an annotation file.
    Stats(StatsArgs),
    /// Check image files against their annotations.
    Check(CheckArgs),
}

/// The annotation file shared by all subcommands.
#[derive(clap::Args)]
struct AnnotationsArg {
    /// WIDER FACE ground-truth file (e.g. wider_face_train_bbx_gt.txt).
    #[arg(short, long, env = "WIDERFACE_ANNOTATIONS")]
    annotations: PathBuf,
}

/// Arguments for the boxes subcommand.
#[derive(clap::Args)]
struct BoxesArgs {
    #[command(flatten)]
    annotations: AnnotationsArg,

    /// Image names, image files, or directories of images.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Output format ('text', 'json', or 'csv').
    #[arg(long, default_value = "text")]
    output: String,

    /// Build the suffix lookup table even for few images.
    #[arg(long)]
    lookup_table: bool,
}

/// Arguments for the list subcommand.
#[derive(clap::Args)]
struct ListArgs {
    #[command(flatten)]
    annotations: AnnotationsArg,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the stats subcommand.
#[derive(clap::Args)]
struct StatsArgs {
    #[command(flatten)]
    annotations: AnnotationsArg,

    /// Output format ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,

    /// Boxes with a side shorter than this many pixels count as small.
    #[arg(long, default_value_t = 10)]
    small_face_px: i64,

    /// Width of histogram bars (in characters).
    #[arg(long, default_value_t = 20)]
    bar_width: usize,
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    #[command(flatten)]
    annotations: AnnotationsArg,

    /// Image files or directories of images.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Pixels a box may extend past the image edge before it is reported.
    #[arg(long, default_value_t = 0)]
    tolerance: u32,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Run the widerface CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), WiderError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Boxes(args)) => run_boxes(args),
        Some(Commands::List(args)) => run_list(args),
        Some(Commands::Stats(args)) => run_stats(args),
        Some(Commands::Check(args)) => run_check(args),
        None => {
            println!("widerface {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("A reader for WIDER FACE bounding-box annotations.");
            println!();
            println!("Run 'widerface --help' for usage information.");
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("widerface={level}")));

    // A subscriber may already be installed when run() is embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn check_format(output: &str, supported: &[&str]) -> Result<(), WiderError> {
    if supported.contains(&output) {
        Ok(())
    } else {
        Err(WiderError::UnsupportedFormat(format!(
            "'{}' (supported: {})",
            output,
            supported.join(", ")
        )))
    }
}

fn write_json<T: Serialize + ?Sized>(value: &T) -> Result<(), WiderError> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).map_err(WiderError::JsonWrite)?;
    writeln!(out)?;
    Ok(())
}

/// Boxes of one queried image, as printed by `boxes --output json`.
#[derive(Serialize)]
struct ImageBoxes {
    image: String,
    boxes: Vec<BBoxRecord>,
}

/// One CSV row of `boxes --output csv`.
#[derive(Serialize)]
struct BoxRow<'a> {
    image: &'a str,
    x: i64,
    y: i64,
    width: i64,
    height: i64,
    blur: Blur,
    expression: Expression,
    illumination: Illumination,
    invalid: Validity,
    occlusion: Occlusion,
    pose: Pose,
}

impl<'a> BoxRow<'a> {
    fn new(image: &'a str, record: &BBoxRecord) -> Self {
        Self {
            image,
            x: record.x(),
            y: record.y(),
            width: record.w(),
            height: record.h(),
            blur: record.blur(),
            expression: record.expression(),
            illumination: record.illumination(),
            invalid: record.invalid(),
            occlusion: record.occlusion(),
            pose: record.pose(),
        }
    }
}

/// Execute the boxes subcommand.
fn run_boxes(args: BoxesArgs) -> Result<(), WiderError> {
    check_format(&args.output, &["text", "json", "csv"])?;

    let images = inputs::expand_inputs(&args.images)?;
    let mut index = AnnotationIndex::load(&args.annotations.annotations)?;
    if args.lookup_table || images.len() > LOOKUP_TABLE_THRESHOLD {
        index = index.with_lookup_table();
    }

    let mut results = Vec::with_capacity(images.len());
    for image in &images {
        let query = image.query();
        let boxes = index.bounding_boxes(&query)?;
        info!(image = %query, boxes = boxes.len(), "found boxes");
        results.push(ImageBoxes {
            image: query,
            boxes,
        });
    }

    match args.output.as_str() {
        "json" => write_json(&results),
        "csv" => {
            let mut writer = csv::Writer::from_writer(io::stdout().lock());
            for result in &results {
                for record in &result.boxes {
                    writer
                        .serialize(BoxRow::new(&result.image, record))
                        .map_err(WiderError::CsvWrite)?;
                }
            }
            writer.flush()?;
            Ok(())
        }
        _ => {
            let mut out = io::stdout().lock();
            for result in &results {
                writeln!(out, "{}: {} box(es)", result.image, result.boxes.len())?;
                for record in &result.boxes {
                    writeln!(out, "  {}", record)?;
                }
            }
            Ok(())
        }
    }
}

/// One image of `list --output json`.
#[derive(Serialize)]
struct ListedImage {
    image: String,
    line: usize,
    boxes: usize,
    placeholder: bool,
}

/// Execute the list subcommand.
fn run_list(args: ListArgs) -> Result<(), WiderError> {
    check_format(&args.output, &["text", "json"])?;

    let index = AnnotationIndex::load(&args.annotations.annotations)?;

    match args.output.as_str() {
        "json" => {
            let listed = index
                .entries()
                .map(|entry| {
                    entry.map(|e| ListedImage {
                        boxes: e.boxes.len(),
                        image: e.image,
                        line: e.line,
                        placeholder: e.placeholder,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            write_json(&listed)
        }
        _ => {
            let mut out = io::stdout().lock();
            for entry in index.entries() {
                let entry = entry?;
                writeln!(out, "{}\t{}", entry.image, entry.boxes.len())?;
            }
            Ok(())
        }
    }
}

/// Execute the stats subcommand.
fn run_stats(args: StatsArgs) -> Result<(), WiderError> {
    check_format(&args.output, &["text", "json"])?;

    let index = AnnotationIndex::load(&args.annotations.annotations)?;
    let opts = stats::StatsOptions {
        small_face_px: args.small_face_px,
        bar_width: args.bar_width,
    };
    let report = stats::stats_annotations(&index, &opts)?;

    match args.output.as_str() {
        "json" => write_json(&report),
        _ => {
            print!("{}", report);
            Ok(())
        }
    }
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), WiderError> {
    check_format(&args.output, &["text", "json"])?;

    let images = inputs::expand_inputs(&args.images)?;
    let mut index = AnnotationIndex::load(&args.annotations.annotations)?;
    if images.len() > LOOKUP_TABLE_THRESHOLD {
        index = index.with_lookup_table();
    }

    let opts = check::CheckOptions {
        strict: args.strict,
        tolerance_px: args.tolerance,
    };
    let report = check::check_images(&index, &images, &opts);

    match args.output.as_str() {
        "json" => write_json(&report)?,
        _ => print!("{}", report),
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (opts.strict && has_warnings) {
        Err(WiderError::CheckFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}
