//! Check report types for structured issue reporting.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// The result of checking images against an annotation file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct CheckReport {
    /// Number of images looked up.
    pub images_checked: usize,
    /// Number of boxes compared against their image.
    pub boxes_checked: usize,
    /// All issues found, in input order.
    pub issues: Vec<CheckIssue>,
}

impl CheckReport {
    /// Creates a new empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an issue to the report.
    pub fn add(&mut self, issue: CheckIssue) {
        self.issues.push(issue);
    }

    /// Returns the number of errors in the report.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings in the report.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.error_count() == 0
    }

    /// Returns true if there are no issues at all.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(
                f,
                "Check passed: {} image(s), {} box(es), no issues found",
                self.images_checked, self.boxes_checked
            );
        }

        writeln!(
            f,
            "Check of {} image(s) and {} box(es) completed with {} error(s) and {} warning(s):",
            self.images_checked,
            self.boxes_checked,
            self.error_count(),
            self.warning_count()
        )?;
        writeln!(f)?;

        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }

        Ok(())
    }
}

/// A single check issue (error or warning).
#[derive(Clone, Debug, Serialize)]
pub struct CheckIssue {
    pub severity: Severity,
    /// A stable code for the issue type.
    pub code: IssueCode,
    pub message: String,
    pub context: IssueContext,
}

impl CheckIssue {
    /// Creates a new error.
    pub fn error(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            context,
        }
    }

    /// Creates a new warning.
    pub fn warning(code: IssueCode, message: impl Into<String>, context: IssueContext) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            context,
        }
    }
}

impl fmt::Display for CheckIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
        };
        write!(
            f,
            "[{}] {:?} in {}: {}",
            severity, self.code, self.context, self.message
        )
    }
}

/// The severity of a check issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Severity {
    /// Suspicious annotation data that may still be usable.
    Warning,
    /// The image cannot be matched or read.
    Error,
}

/// A stable code identifying the type of check issue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum IssueCode {
    // Lookup issues
    /// The image has no block in the annotation file.
    ImageNotAnnotated,
    /// The image's block could not be parsed.
    MalformedAnnotation,

    // Image issues
    /// The argument named an image with no file on disk.
    ImageFileMissing,
    /// The image header could not be read.
    ImageUnreadable,

    // Bounding box issues
    /// A box has zero or negative width or height.
    DegenerateBox,
    /// A box starts left of or above the image.
    NegativeOrigin,
    /// A box extends past the right or bottom edge of the image.
    BoxOutOfBounds,
}

/// Where an issue occurred.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueContext {
    /// Issue with an image as a whole.
    Image { path: PathBuf },
    /// Issue with one box of an image (0-based position in its block).
    Box { path: PathBuf, index: usize },
}

impl fmt::Display for IssueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueContext::Image { path } => write!(f, "image {}", path.display()),
            IssueContext::Box { path, index } => {
                write!(f, "box {} of {}", index, path.display())
            }
        }
    }
}
