//! Annotation file statistics.
//!
//! Walks every image block of an annotation file and summarizes box counts,
//! the six attribute distributions and box geometry.

mod report;

pub use report::{
    AttributeBucket, AttributeHistogram, BoxSizeStats, DensityStats, StatsReport, SummarySection,
};

use tracing::debug;

use crate::error::WiderError;
use crate::wider::{
    AnnotationEntry, AnnotationIndex, BBoxRecord, Blur, Expression, FaceAttribute, Illumination,
    Occlusion, Pose, Validity,
};

/// Options for annotation statistics.
#[derive(Clone, Debug)]
pub struct StatsOptions {
    /// Boxes with a side shorter than this (in pixels) count as small faces.
    pub small_face_px: i64,
    /// Width of histogram bars (in characters).
    pub bar_width: usize,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            small_face_px: 10,
            bar_width: 20,
        }
    }
}

/// Compute a statistics report for a whole annotation file.
///
/// Fails on the first structurally broken block, since nothing after it can
/// be located reliably.
pub fn stats_annotations(
    index: &AnnotationIndex,
    opts: &StatsOptions,
) -> Result<StatsReport, WiderError> {
    let entries: Vec<AnnotationEntry> = index.entries().collect::<Result<_, _>>()?;
    debug!(images = entries.len(), "collected annotation entries");

    let boxes: Vec<&BBoxRecord> = entries.iter().flat_map(|e| e.boxes.iter()).collect();

    let attributes = vec![
        histogram::<Blur>(&boxes, BBoxRecord::blur),
        histogram::<Expression>(&boxes, BBoxRecord::expression),
        histogram::<Illumination>(&boxes, BBoxRecord::illumination),
        histogram::<Validity>(&boxes, BBoxRecord::invalid),
        histogram::<Occlusion>(&boxes, BBoxRecord::occlusion),
        histogram::<Pose>(&boxes, BBoxRecord::pose),
    ];

    Ok(StatsReport {
        summary: compute_summary(&entries, &boxes),
        attributes,
        sizes: compute_sizes(&boxes, opts.small_face_px),
        density: compute_density(&entries),
        bar_width: opts.bar_width,
    })
}

fn compute_summary(entries: &[AnnotationEntry], boxes: &[&BBoxRecord]) -> SummarySection {
    let annotated_images = entries.iter().filter(|e| !e.boxes.is_empty()).count();
    let valid_boxes = boxes.iter().filter(|b| b.is_valid()).count();

    SummarySection {
        images: entries.len(),
        annotated_images,
        empty_images: entries.len() - annotated_images,
        placeholder_lines: entries.iter().filter(|e| e.placeholder).count(),
        boxes: boxes.len(),
        valid_boxes,
        invalid_boxes: boxes.len() - valid_boxes,
    }
}

fn histogram<T: FaceAttribute>(
    boxes: &[&BBoxRecord],
    field: impl Fn(&BBoxRecord) -> T,
) -> AttributeHistogram {
    let mut counts = vec![0usize; T::ALL.len()];
    for &record in boxes {
        let value = field(record);
        if let Some(slot) = T::ALL.iter().position(|v| *v == value) {
            counts[slot] += 1;
        }
    }

    AttributeHistogram {
        field: T::FIELD,
        total: boxes.len(),
        buckets: T::ALL
            .iter()
            .zip(counts)
            .map(|(variant, count)| AttributeBucket {
                label: variant.label(),
                code: variant.code(),
                count,
            })
            .collect(),
    }
}

fn compute_sizes(boxes: &[&BBoxRecord], small_face_px: i64) -> BoxSizeStats {
    let mut stats = BoxSizeStats {
        small_face_px,
        ..Default::default()
    };

    let mut width_sum = 0f64;
    let mut height_sum = 0f64;
    let mut measured = 0usize;

    for record in boxes {
        let (w, h) = (record.w(), record.h());
        if w <= 0 || h <= 0 {
            stats.degenerate += 1;
            continue;
        }

        measured += 1;
        width_sum += w as f64;
        height_sum += h as f64;

        stats.min_width = Some(stats.min_width.map_or(w, |m| m.min(w)));
        stats.max_width = Some(stats.max_width.map_or(w, |m| m.max(w)));
        stats.min_height = Some(stats.min_height.map_or(h, |m| m.min(h)));
        stats.max_height = Some(stats.max_height.map_or(h, |m| m.max(h)));

        if w < small_face_px || h < small_face_px {
            stats.small += 1;
        }
    }

    if measured > 0 {
        stats.mean_width = Some(width_sum / measured as f64);
        stats.mean_height = Some(height_sum / measured as f64);
    }

    stats
}

fn compute_density(entries: &[AnnotationEntry]) -> DensityStats {
    let busiest = entries
        .iter()
        .enumerate()
        // Earliest block wins ties.
        .max_by(|(ia, a), (ib, b)| a.boxes.len().cmp(&b.boxes.len()).then(ib.cmp(ia)))
        .map(|(_, e)| e);

    let total: usize = entries.iter().map(|e| e.boxes.len()).sum();
    let mean_per_image = if entries.is_empty() {
        0.0
    } else {
        total as f64 / entries.len() as f64
    };

    DensityStats {
        max_per_image: busiest.map_or(0, |e| e.boxes.len()),
        mean_per_image,
        busiest_image: busiest
            .filter(|e| !e.boxes.is_empty())
            .map(|e| e.image.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "0--Parade/a.jpg\n\
                          3\n\
                          10 10 20 20 0 0 0 0 0 0\n\
                          30 30 5 8 2 1 0 0 1 0\n\
                          40 40 0 12 1 0 1 1 2 1\n\
                          1--Handshaking/b.jpg\n\
                          0\n\
                          0 0 0 0 0 0 0 0 0 0\n\
                          2--Demonstration/c.jpg\n\
                          1\n\
                          1 1 12 16 0 0 0 0 0 0\n";

    fn sample_report() -> StatsReport {
        let index = AnnotationIndex::from_str_with_source(SAMPLE, "gt.txt");
        stats_annotations(&index, &StatsOptions::default()).expect("compute stats")
    }

    #[test]
    fn summary_counts_images_and_boxes() {
        let s = sample_report().summary;
        assert_eq!(s.images, 3);
        assert_eq!(s.annotated_images, 2);
        assert_eq!(s.empty_images, 1);
        assert_eq!(s.placeholder_lines, 1);
        assert_eq!(s.boxes, 4);
        assert_eq!(s.valid_boxes, 3);
        assert_eq!(s.invalid_boxes, 1);
    }

    #[test]
    fn histograms_follow_code_order() {
        let report = sample_report();
        let blur = &report.attributes[0];
        assert_eq!(blur.field, "blur");
        let counts: Vec<usize> = blur.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 1]);

        let occlusion = &report.attributes[4];
        assert_eq!(occlusion.field, "occlusion");
        assert_eq!(occlusion.buckets[2].label, "HEAVY");
        assert_eq!(occlusion.buckets[2].count, 1);
    }

    #[test]
    fn sizes_skip_degenerate_boxes() {
        let sizes = sample_report().sizes;
        assert_eq!(sizes.degenerate, 1);
        assert_eq!(sizes.min_width, Some(5));
        assert_eq!(sizes.max_width, Some(20));
        assert_eq!(sizes.min_height, Some(8));
        assert_eq!(sizes.max_height, Some(20));
        assert_eq!(sizes.small, 1);
        let mean_w = sizes.mean_width.expect("mean width");
        assert!((mean_w - 37.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn density_names_the_busiest_image() {
        let density = sample_report().density;
        assert_eq!(density.max_per_image, 3);
        assert_eq!(density.busiest_image.as_deref(), Some("0--Parade/a.jpg"));
        assert!((density.mean_per_image - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_file_produces_empty_report() {
        let index = AnnotationIndex::from_str_with_source("", "empty.txt");
        let report = stats_annotations(&index, &StatsOptions::default()).expect("stats");
        assert_eq!(report.summary.images, 0);
        assert_eq!(report.density.busiest_image, None);
        assert_eq!(report.sizes.mean_width, None);
    }

    #[test]
    fn broken_block_fails_the_report() {
        let index = AnnotationIndex::from_str_with_source("a.jpg\n2\n1 1 1 1 0 0 0 0 0 0\n", "gt.txt");
        let err = stats_annotations(&index, &StatsOptions::default()).unwrap_err();
        assert!(matches!(err, WiderError::InvalidEntry { .. }));
    }
}
