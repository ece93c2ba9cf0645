//! WIDER FACE ground-truth annotations.
//!
//! The WIDER FACE benchmark (<http://shuoyang1213.me/WIDERFACE/>) ships its
//! face boxes as plain text files such as `wider_face_train_bbx_gt.txt`:
//!
//! ```text
//! File name
//! Number of bounding box
//! x1, y1, w, h, blur, expression, illumination, invalid, occlusion, pose
//! ```
//!
//! [`AnnotationIndex`] loads such a file and answers per-image queries;
//! [`BBoxRecord`] is one parsed box line.
//!
//! # Example
//!
//! ```
//! use widerface::wider::{AnnotationIndex, Blur};
//!
//! let text = "0--Parade/0_Parade_marchingband_1_849.jpg\n1\n449 330 122 149 0 0 0 0 0 0\n";
//! let index = AnnotationIndex::from_str_with_source(text, "gt.txt");
//!
//! let boxes = index.bounding_boxes("0_Parade_marchingband_1_849.jpg").unwrap();
//! assert_eq!(boxes.len(), 1);
//! assert_eq!(boxes[0].w(), 122);
//! assert_eq!(boxes[0].blur(), Blur::Clear);
//! ```

mod attributes;
mod index;
mod record;

pub use attributes::{Blur, Expression, FaceAttribute, Illumination, Occlusion, Pose, Validity};
pub use index::{basename, AnnotationEntry, AnnotationIndex, Entries};
pub use record::{BBoxRecord, RECORD_TOKENS};

#[cfg(feature = "fuzzing")]
pub use index::fuzz_walk_annotations;
#[cfg(feature = "fuzzing")]
pub use record::fuzz_parse_record_line;
