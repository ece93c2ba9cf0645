//! Per-face attribute codes of the WIDER FACE ground truth.
//!
//! Each bounding box line carries six classification fields after the
//! geometry. The dataset's readme documents them as small integer codes;
//! they are modelled here as closed enumerations whose discriminants are
//! exactly those codes. Unknown codes are rejected, never defaulted.

use serde::Serialize;
use std::fmt;

/// Common behavior of the six attribute enumerations.
pub trait FaceAttribute: Copy + Eq + fmt::Debug + 'static {
    /// Field name as used in error messages and reports.
    const FIELD: &'static str;

    /// Every variant, in code order.
    const ALL: &'static [Self];

    /// The dataset's integer code for this variant.
    fn code(self) -> u8;

    /// Upper-case label, matching the serialized form.
    fn label(self) -> &'static str;

    /// Looks up the variant for a dataset code.
    fn from_code(code: i64) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|variant| i64::from(variant.code()) == code)
    }
}

/// Blur level of the face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Blur {
    Clear = 0,
    Normal = 1,
    Heavy = 2,
}

impl FaceAttribute for Blur {
    const FIELD: &'static str = "blur";
    const ALL: &'static [Self] = &[Blur::Clear, Blur::Normal, Blur::Heavy];

    fn code(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Blur::Clear => "CLEAR",
            Blur::Normal => "NORMAL",
            Blur::Heavy => "HEAVY",
        }
    }
}

/// Facial expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Expression {
    Typical = 0,
    Exaggerate = 1,
}

impl FaceAttribute for Expression {
    const FIELD: &'static str = "expression";
    const ALL: &'static [Self] = &[Expression::Typical, Expression::Exaggerate];

    fn code(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Expression::Typical => "TYPICAL",
            Expression::Exaggerate => "EXAGGERATE",
        }
    }
}

/// Lighting conditions on the face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Illumination {
    Normal = 0,
    Extreme = 1,
}

impl FaceAttribute for Illumination {
    const FIELD: &'static str = "illumination";
    const ALL: &'static [Self] = &[Illumination::Normal, Illumination::Extreme];

    fn code(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Illumination::Normal => "NORMAL",
            Illumination::Extreme => "EXTREME",
        }
    }
}

/// Whether the annotators considered the box a usable face.
///
/// This is a property of the annotation itself, not a parse outcome: an
/// `Invalid` record parsed perfectly fine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Validity {
    Valid = 0,
    Invalid = 1,
}

impl FaceAttribute for Validity {
    const FIELD: &'static str = "invalid";
    const ALL: &'static [Self] = &[Validity::Valid, Validity::Invalid];

    fn code(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Validity::Valid => "VALID",
            Validity::Invalid => "INVALID",
        }
    }
}

/// How much of the face is covered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Occlusion {
    None = 0,
    Partial = 1,
    Heavy = 2,
}

impl FaceAttribute for Occlusion {
    const FIELD: &'static str = "occlusion";
    const ALL: &'static [Self] = &[Occlusion::None, Occlusion::Partial, Occlusion::Heavy];

    fn code(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Occlusion::None => "NONE",
            Occlusion::Partial => "PARTIAL",
            Occlusion::Heavy => "HEAVY",
        }
    }
}

/// Head pose.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Pose {
    Typical = 0,
    Atypical = 1,
}

impl FaceAttribute for Pose {
    const FIELD: &'static str = "pose";
    const ALL: &'static [Self] = &[Pose::Typical, Pose::Atypical];

    fn code(self) -> u8 {
        self as u8
    }

    fn label(self) -> &'static str {
        match self {
            Pose::Typical => "TYPICAL",
            Pose::Atypical => "ATYPICAL",
        }
    }
}

macro_rules! impl_display_via_label {
    ($($ty:ty),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.label())
                }
            }
        )*
    };
}

impl_display_via_label!(Blur, Expression, Illumination, Validity, Occlusion, Pose);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_discriminants() {
        assert_eq!(Blur::Heavy.code(), 2);
        assert_eq!(Occlusion::Partial.code(), 1);
        assert_eq!(Validity::Invalid.code(), 1);
        assert_eq!(Pose::Typical.code(), 0);
    }

    #[test]
    fn from_code_accepts_every_documented_value() {
        for blur in Blur::ALL {
            assert_eq!(Blur::from_code(i64::from(blur.code())), Some(*blur));
        }
        for occlusion in Occlusion::ALL {
            assert_eq!(
                Occlusion::from_code(i64::from(occlusion.code())),
                Some(*occlusion)
            );
        }
    }

    #[test]
    fn from_code_rejects_unknown_values() {
        assert_eq!(Blur::from_code(3), None);
        assert_eq!(Blur::from_code(-1), None);
        assert_eq!(Expression::from_code(2), None);
        assert_eq!(Illumination::from_code(2), None);
        assert_eq!(Validity::from_code(2), None);
        assert_eq!(Occlusion::from_code(3), None);
        assert_eq!(Pose::from_code(2), None);
    }

    #[test]
    fn labels_match_serialized_form() {
        assert_eq!(serde_json::to_string(&Blur::Heavy).unwrap(), "\"HEAVY\"");
        assert_eq!(
            serde_json::to_string(&Expression::Exaggerate).unwrap(),
            "\"EXAGGERATE\""
        );
        assert_eq!(Validity::Invalid.to_string(), "INVALID");
        assert_eq!(Occlusion::None.to_string(), "NONE");
    }
}
