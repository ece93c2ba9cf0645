//! A single face bounding box line.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::attributes::{
    Blur, Expression, FaceAttribute, Illumination, Occlusion, Pose, Validity,
};
use crate::error::WiderError;

/// Number of integer tokens that make up one bounding box line.
pub const RECORD_TOKENS: usize = 10;

const FIELD_NAMES: [&str; RECORD_TOKENS] = [
    "x",
    "y",
    "width",
    "height",
    Blur::FIELD,
    Expression::FIELD,
    Illumination::FIELD,
    Validity::FIELD,
    Occlusion::FIELD,
    Pose::FIELD,
];

/// One annotated face of one image.
///
/// The dataset readme describes a box line as
/// `x1, y1, w, h, blur, expression, illumination, invalid, occlusion, pose`
/// (whitespace-separated in the actual files). Geometry is kept exactly as
/// written: zero-sized or negative values are representable so that
/// `check` can report them instead of the parser refusing the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct BBoxRecord {
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

impl BBoxRecord {
    /// Parses one bounding box line (e.g. `"78 238 14 17 2 0 0 0 0 0 "`).
    ///
    /// Tokens are split on any whitespace. The first ten must be base-10
    /// integers; anything after them is ignored.
    pub fn parse(raw_line: &str) -> Result<Self, WiderError> {
        // Only the first ten tokens matter, so never collect more.
        let tokens: Vec<&str> = raw_line.split_whitespace().take(RECORD_TOKENS).collect();
        if tokens.len() < RECORD_TOKENS {
            return Err(WiderError::malformed(format!(
                "expected {} tokens, found {} in '{}'",
                RECORD_TOKENS,
                tokens.len(),
                raw_line.trim()
            )));
        }

        let mut values = [0i64; RECORD_TOKENS];
        for (index, token) in tokens.iter().enumerate() {
            values[index] = token.parse::<i64>().map_err(|_| {
                WiderError::malformed(format!(
                    "invalid {} '{}'; expected integer",
                    FIELD_NAMES[index], token
                ))
            })?;
        }

        Ok(Self {
            x: values[0],
            y: values[1],
            width: values[2],
            height: values[3],
            blur: attribute(values[4])?,
            expression: attribute(values[5])?,
            illumination: attribute(values[6])?,
            invalid: attribute(values[7])?,
            occlusion: attribute(values[8])?,
            pose: attribute(values[9])?,
        })
    }

    /// Left edge in pixels.
    #[inline]
    pub fn x(&self) -> i64 {
        self.x
    }

    /// Top edge in pixels.
    #[inline]
    pub fn y(&self) -> i64 {
        self.y
    }

    /// Box width in pixels.
    #[inline]
    pub fn w(&self) -> i64 {
        self.width
    }

    /// Box height in pixels.
    #[inline]
    pub fn h(&self) -> i64 {
        self.height
    }

    #[inline]
    pub fn blur(&self) -> Blur {
        self.blur
    }

    #[inline]
    pub fn expression(&self) -> Expression {
        self.expression
    }

    #[inline]
    pub fn illumination(&self) -> Illumination {
        self.illumination
    }

    /// The annotators' validity flag for this face.
    #[inline]
    pub fn invalid(&self) -> Validity {
        self.invalid
    }

    #[inline]
    pub fn occlusion(&self) -> Occlusion {
        self.occlusion
    }

    #[inline]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Returns true unless the record is flagged invalid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.invalid == Validity::Valid
    }

    /// Right edge (exclusive) in pixels.
    #[inline]
    pub fn right(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive) in pixels.
    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height)
    }

    /// Box area in square pixels. Zero for degenerate boxes.
    #[inline]
    pub fn area(&self) -> i64 {
        self.width.max(0).saturating_mul(self.height.max(0))
    }

    /// Renders the record back into the dataset's ten-token line format.
    pub fn to_wider_line(&self) -> String {
        format!(
            "{} {} {} {} {} {} {} {} {} {}",
            self.x,
            self.y,
            self.width,
            self.height,
            self.blur.code(),
            self.expression.code(),
            self.illumination.code(),
            self.invalid.code(),
            self.occlusion.code(),
            self.pose.code()
        )
    }
}

fn attribute<T: FaceAttribute>(code: i64) -> Result<T, WiderError> {
    T::from_code(code).ok_or_else(|| {
        let allowed: Vec<String> = T::ALL.iter().map(|v| v.code().to_string()).collect();
        WiderError::malformed(format!(
            "{} code {} is out of range (expected one of {})",
            T::FIELD,
            code,
            allowed.join(", ")
        ))
    })
}

impl FromStr for BBoxRecord {
    type Err = WiderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for BBoxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BBoxRecord x: {} y: {} width: {} height: {} {}",
            self.x, self.y, self.width, self.height, self.invalid
        )
    }
}

/// Fuzz-only entrypoint for single-line record parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_record_line(input: &str) -> Result<(), WiderError> {
    let record = BBoxRecord::parse(input)?;
    let reparsed = BBoxRecord::parse(&record.to_wider_line())?;
    assert_eq!(record, reparsed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_fields_in_positional_order() {
        let record = BBoxRecord::parse("78 238 14 17 2 0 0 0 0 0").expect("parse record");

        assert_eq!(record.x(), 78);
        assert_eq!(record.y(), 238);
        assert_eq!(record.w(), 14);
        assert_eq!(record.h(), 17);
        assert_eq!(record.blur(), Blur::Heavy);
        assert_eq!(record.expression(), Expression::Typical);
        assert_eq!(record.illumination(), Illumination::Normal);
        assert_eq!(record.invalid(), Validity::Valid);
        assert_eq!(record.occlusion(), Occlusion::None);
        assert_eq!(record.pose(), Pose::Typical);
    }

    #[test]
    fn parse_tolerates_surrounding_and_repeated_whitespace() {
        let record =
            BBoxRecord::parse("  5\t6  7 8 1 1 1 1 2 1 \r").expect("parse padded record");

        assert_eq!((record.x(), record.y(), record.w(), record.h()), (5, 6, 7, 8));
        assert_eq!(record.blur(), Blur::Normal);
        assert_eq!(record.expression(), Expression::Exaggerate);
        assert_eq!(record.illumination(), Illumination::Extreme);
        assert_eq!(record.invalid(), Validity::Invalid);
        assert_eq!(record.occlusion(), Occlusion::Heavy);
        assert_eq!(record.pose(), Pose::Atypical);
    }

    #[test]
    fn parse_ignores_tokens_after_the_tenth() {
        let record = BBoxRecord::parse("1 2 3 4 0 0 0 0 0 0 junk 99").expect("parse record");
        assert_eq!(record.to_wider_line(), "1 2 3 4 0 0 0 0 0 0");
    }

    #[test]
    fn parse_accepts_zero_sized_boxes() {
        let record = BBoxRecord::parse("0 0 0 0 0 0 0 0 0 0").expect("parse zero box");
        assert_eq!(record.w(), 0);
        assert_eq!(record.h(), 0);
        assert_eq!(record.area(), 0);
    }

    #[test]
    fn parse_rejects_out_of_range_blur() {
        let err = BBoxRecord::parse("0 0 10 10 3 0 0 0 0 0").unwrap_err();
        assert!(matches!(err, WiderError::MalformedRecord { .. }));
        assert!(err.to_string().contains("blur code 3"));
    }

    #[test]
    fn parse_rejects_short_lines() {
        let err = BBoxRecord::parse("1 2 3").unwrap_err();
        assert!(matches!(err, WiderError::MalformedRecord { .. }));
        assert!(err.to_string().contains("found 3"));
    }

    #[test]
    fn parse_rejects_non_integer_tokens() {
        let err = BBoxRecord::parse("1 2 3.5 4 0 0 0 0 0 0").unwrap_err();
        assert!(matches!(err, WiderError::MalformedRecord { .. }));
        assert!(err.to_string().contains("invalid width '3.5'"));
    }

    #[test]
    fn parse_rejects_a_header_line() {
        let err = BBoxRecord::parse("0--Parade/0_Parade_marchingband_1_849.jpg").unwrap_err();
        assert!(matches!(err, WiderError::MalformedRecord { .. }));
    }

    #[test]
    fn display_lists_geometry_and_validity() {
        let record = BBoxRecord::parse("78 238 14 17 2 0 0 1 0 0").expect("parse record");
        assert_eq!(
            record.to_string(),
            "BBoxRecord x: 78 y: 238 width: 14 height: 17 INVALID"
        );
    }

    #[test]
    fn from_str_matches_parse() {
        let parsed: BBoxRecord = "9 8 7 6 1 0 1 0 2 1".parse().expect("from_str");
        assert_eq!(parsed, BBoxRecord::parse("9 8 7 6 1 0 1 0 2 1").unwrap());
    }

    #[test]
    fn edges_and_area() {
        let record = BBoxRecord::parse("10 20 30 40 0 0 0 0 0 0").unwrap();
        assert_eq!(record.right(), 40);
        assert_eq!(record.bottom(), 60);
        assert_eq!(record.area(), 1200);
        assert!(record.is_valid());
    }
}
