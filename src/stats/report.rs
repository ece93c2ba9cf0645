//! Stats report types and terminal formatting.
//!
//! The report renders as text (Display) or serializes as JSON.

use serde::Serialize;
use std::fmt;

/// The result of computing annotation statistics.
#[derive(Clone, Debug, Serialize)]
pub struct StatsReport {
    /// Summary counts for the file.
    pub summary: SummarySection,
    /// One histogram per face attribute, in record column order.
    pub attributes: Vec<AttributeHistogram>,
    /// Box geometry statistics.
    pub sizes: BoxSizeStats,
    /// Boxes-per-image statistics.
    pub density: DensityStats,
    /// Display-only option for histogram rendering width.
    #[serde(skip)]
    pub(crate) bar_width: usize,
}

/// Summary counts for the file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SummarySection {
    /// Number of image blocks.
    pub images: usize,
    /// Images with at least one box.
    pub annotated_images: usize,
    /// Images with a box count of zero.
    pub empty_images: usize,
    /// Zero-count blocks that carried a placeholder box line.
    pub placeholder_lines: usize,
    /// Total number of boxes.
    pub boxes: usize,
    /// Boxes flagged valid.
    pub valid_boxes: usize,
    /// Boxes flagged invalid.
    pub invalid_boxes: usize,
}

/// Distribution of one face attribute.
#[derive(Clone, Debug, Serialize)]
pub struct AttributeHistogram {
    /// Attribute name (`blur`, `occlusion`, ...).
    pub field: &'static str,
    /// Total boxes counted.
    pub total: usize,
    /// One bucket per attribute value, in code order.
    pub buckets: Vec<AttributeBucket>,
}

/// A single attribute value with its box count.
#[derive(Clone, Debug, Serialize)]
pub struct AttributeBucket {
    pub label: &'static str,
    pub code: u8,
    pub count: usize,
}

/// Box geometry statistics.
///
/// Degenerate boxes (zero or negative width or height) are counted but
/// excluded from the min/max/mean figures.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BoxSizeStats {
    pub min_width: Option<i64>,
    pub max_width: Option<i64>,
    pub mean_width: Option<f64>,
    pub min_height: Option<i64>,
    pub max_height: Option<i64>,
    pub mean_height: Option<f64>,
    /// Boxes with zero or negative width or height.
    pub degenerate: usize,
    /// Threshold used for `small`.
    pub small_face_px: i64,
    /// Boxes with a side shorter than `small_face_px`.
    pub small: usize,
}

/// Boxes-per-image statistics.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DensityStats {
    pub max_per_image: usize,
    pub mean_per_image: f64,
    /// Header of the first image with `max_per_image` boxes.
    pub busiest_image: Option<String>,
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "WIDER FACE annotation stats")?;
        writeln!(f)?;

        self.fmt_summary(f)?;
        writeln!(f)?;
        for histogram in &self.attributes {
            self.fmt_histogram(f, histogram)?;
            writeln!(f)?;
        }
        self.fmt_sizes(f)?;
        writeln!(f)?;
        self.fmt_density(f)?;

        Ok(())
    }
}

impl StatsReport {
    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;

        section_header(f, "Summary")?;
        writeln!(f, "│   Images:        {:>10}", format_number(s.images))?;
        writeln!(
            f,
            "│   Annotated:     {:>10} ({})",
            format_number(s.annotated_images),
            fmt_percent(s.annotated_images, s.images)
        )?;
        writeln!(
            f,
            "│   Without faces: {:>10} ({} with placeholder line)",
            format_number(s.empty_images),
            format_number(s.placeholder_lines)
        )?;
        writeln!(f, "│   Boxes:         {:>10}", format_number(s.boxes))?;
        writeln!(
            f,
            "│   Invalid boxes: {:>10} ({})",
            format_number(s.invalid_boxes),
            fmt_percent(s.invalid_boxes, s.boxes)
        )?;
        section_footer(f)
    }

    fn fmt_histogram(&self, f: &mut fmt::Formatter<'_>, h: &AttributeHistogram) -> fmt::Result {
        section_header(f, &format!("Attribute: {}", h.field))?;

        if h.total == 0 {
            writeln!(f, "│   No boxes found.")?;
        } else {
            let max_count = h.buckets.iter().map(|b| b.count).max().unwrap_or(0);
            for bucket in &h.buckets {
                let bar = render_bar(bucket.count, max_count, self.bar_width);
                writeln!(
                    f,
                    "│   {:<2} {:<11} {:>9} {:>6}  {}",
                    bucket.code,
                    bucket.label,
                    format_number(bucket.count),
                    fmt_percent(bucket.count, h.total),
                    pad_bar(&bar, self.bar_width)
                )?;
            }
        }

        section_footer(f)
    }

    fn fmt_sizes(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.sizes;

        section_header(f, "Box sizes (px)")?;
        match (s.min_width, s.max_width, s.mean_width) {
            (Some(min), Some(max), Some(mean)) => {
                writeln!(f, "│   Width:   min {:>6}  max {:>6}  mean {:>8.1}", min, max, mean)?;
            }
            _ => writeln!(f, "│   Width:   n/a")?,
        }
        match (s.min_height, s.max_height, s.mean_height) {
            (Some(min), Some(max), Some(mean)) => {
                writeln!(f, "│   Height:  min {:>6}  max {:>6}  mean {:>8.1}", min, max, mean)?;
            }
            _ => writeln!(f, "│   Height:  n/a")?,
        }
        writeln!(
            f,
            "│   Small (< {} px):  {}",
            s.small_face_px,
            format_number(s.small)
        )?;
        writeln!(f, "│   Degenerate:       {}", format_number(s.degenerate))?;
        section_footer(f)
    }

    fn fmt_density(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.density;

        section_header(f, "Boxes per image")?;
        writeln!(f, "│   Mean:  {:.2}", d.mean_per_image)?;
        match &d.busiest_image {
            Some(image) => writeln!(
                f,
                "│   Max:   {} ({})",
                format_number(d.max_per_image),
                image
            )?,
            None => writeln!(f, "│   Max:   0")?,
        }
        section_footer(f)
    }
}

fn section_header(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(
        f,
        "┌─ {} {}",
        title,
        "─".repeat(57usize.saturating_sub(title.chars().count()))
    )
}

fn section_footer(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "└{}", "─".repeat(60))
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a percentage, handling zero denominators.
fn fmt_percent(numerator: usize, denominator: usize) -> String {
    if denominator == 0 {
        "n/a".to_string()
    } else {
        format!("{:.1}%", (numerator as f64 / denominator as f64) * 100.0)
    }
}

/// Render a horizontal bar using Unicode block characters.
fn render_bar(count: usize, max_count: usize, width: usize) -> String {
    if max_count == 0 || width == 0 {
        return String::new();
    }

    let filled = (count * width) / max_count;
    let filled = filled.min(width);
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// Pad a bar string to ensure consistent column alignment.
fn pad_bar(bar: &str, width: usize) -> String {
    let visual_len = bar.chars().count();
    let padding = width.saturating_sub(visual_len);
    format!("{}{}", bar, " ".repeat(padding))
}
