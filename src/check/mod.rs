//! Cross-checks image files against an annotation file.
//!
//! For each image this looks up its boxes, reads the image dimensions from
//! the file header (no pixel decoding) and reports:
//! - images missing from the annotation file or with a broken block
//! - boxes with zero or negative size
//! - boxes that start outside or extend past the image

mod report;

pub use report::{CheckIssue, CheckReport, IssueCode, IssueContext, Severity};

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::WiderError;
use crate::inputs::ImageInput;
use crate::wider::{AnnotationIndex, BBoxRecord};

/// Options for check behavior.
#[derive(Clone, Debug, Default)]
pub struct CheckOptions {
    /// If true, treat warnings as errors.
    pub strict: bool,
    /// Pixels a box may extend past the image edge before it is reported.
    pub tolerance_px: u32,
}

/// Checks every image in `images` and returns a report of all issues found.
pub fn check_images(
    index: &AnnotationIndex,
    images: &[ImageInput],
    opts: &CheckOptions,
) -> CheckReport {
    let mut report = CheckReport::new();

    for image in images {
        report.images_checked += 1;

        let Some(path) = image.path() else {
            report.add(CheckIssue::error(
                IssueCode::ImageFileMissing,
                "no image file to compare against",
                IssueContext::Image {
                    path: PathBuf::from(image.query()),
                },
            ));
            continue;
        };

        let boxes = match index.bounding_boxes(&image.query()) {
            Ok(boxes) => boxes,
            Err(err) => {
                let code = match err {
                    WiderError::ImageNotFound { .. } => IssueCode::ImageNotAnnotated,
                    _ => IssueCode::MalformedAnnotation,
                };
                report.add(CheckIssue::error(code, err.to_string(), image_context(path)));
                continue;
            }
        };

        let (width, height) = match read_image_dimensions(path) {
            Ok(dims) => dims,
            Err(err) => {
                report.add(CheckIssue::error(
                    IssueCode::ImageUnreadable,
                    err.to_string(),
                    image_context(path),
                ));
                continue;
            }
        };

        debug!(
            image = %path.display(),
            width,
            height,
            boxes = boxes.len(),
            "checking boxes"
        );

        for (box_index, record) in boxes.iter().enumerate() {
            report.boxes_checked += 1;
            check_box(record, path, box_index, (width, height), opts, &mut report);
        }
    }

    report
}

fn check_box(
    record: &BBoxRecord,
    path: &Path,
    box_index: usize,
    (width, height): (i64, i64),
    opts: &CheckOptions,
    report: &mut CheckReport,
) {
    let context = || IssueContext::Box {
        path: path.to_path_buf(),
        index: box_index,
    };

    if record.w() <= 0 || record.h() <= 0 {
        report.add(CheckIssue::warning(
            IssueCode::DegenerateBox,
            format!("box has size {}x{}", record.w(), record.h()),
            context(),
        ));
    }

    let tolerance = i64::from(opts.tolerance_px);

    if record.x() < -tolerance || record.y() < -tolerance {
        report.add(CheckIssue::warning(
            IssueCode::NegativeOrigin,
            format!("box starts at ({}, {})", record.x(), record.y()),
            context(),
        ));
    }

    if record.right() > width.saturating_add(tolerance)
        || record.bottom() > height.saturating_add(tolerance)
    {
        report.add(CheckIssue::warning(
            IssueCode::BoxOutOfBounds,
            format!(
                "box ({}, {}) to ({}, {}) exceeds image size {}x{}",
                record.x(),
                record.y(),
                record.right(),
                record.bottom(),
                width,
                height
            ),
            context(),
        ));
    }
}

fn image_context(path: &Path) -> IssueContext {
    IssueContext::Image {
        path: path.to_path_buf(),
    }
}

fn read_image_dimensions(path: &Path) -> Result<(i64, i64), WiderError> {
    let size = imagesize::size(path).map_err(|source| WiderError::ImageDimensionRead {
        path: path.to_path_buf(),
        source,
    })?;

    Ok((size.width as i64, size.height as i64))
}
