use serde::{Deserialize, Serialize};

/// Segment-count parity rule for log segmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentParity {
    /// Odd segment counts are acceptable (code 1).
    OddAllowed,
    /// Only even segment counts are acceptable (code 2).
    EvenOnly,
}

impl SegmentParity {
    /// Numeric code used by the volume engine.
    pub fn code(self) -> i32 {
        match self {
            SegmentParity::OddAllowed => 1,
            SegmentParity::EvenOnly => 2,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(SegmentParity::OddAllowed),
            2 => Some(SegmentParity::EvenOnly),
            _ => None,
        }
    }
}

/// Segmentation-option code: how the stem is cut into segments, and what
/// happens to a top segment shorter than the minimum length.
///
/// The 1x codes cut fixed-length segments; the 2x codes cut nominal-length
/// segments with the remainder pushed into the top segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentationOption {
    /// Fixed length, short top combined with the previous segment (11).
    FixedShortCombined,
    /// Fixed length, short top stands alone (12).
    FixedShortAlone,
    /// Fixed length, short top carried at half length (13).
    FixedShortHalf,
    /// Nominal length, short top combined with the previous segment (21).
    NominalShortCombined,
    /// Nominal length, short top stands alone (23).
    NominalShortAlone,
    /// Nominal length, short top carried at half length (24).
    NominalShortHalf,
}

impl SegmentationOption {
    /// Numeric code used by the volume engine.
    pub fn code(self) -> i32 {
        match self {
            SegmentationOption::FixedShortCombined => 11,
            SegmentationOption::FixedShortAlone => 12,
            SegmentationOption::FixedShortHalf => 13,
            SegmentationOption::NominalShortCombined => 21,
            SegmentationOption::NominalShortAlone => 23,
            SegmentationOption::NominalShortHalf => 24,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            11 => Some(SegmentationOption::FixedShortCombined),
            12 => Some(SegmentationOption::FixedShortAlone),
            13 => Some(SegmentationOption::FixedShortHalf),
            21 => Some(SegmentationOption::NominalShortCombined),
            23 => Some(SegmentationOption::NominalShortAlone),
            24 => Some(SegmentationOption::NominalShortHalf),
            _ => None,
        }
    }

    /// True for the nominal-length (2x) family of options.
    pub fn is_nominal(self) -> bool {
        self.code() >= 21
    }
}

/// Board-foot scaling basis for Scribner volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalingBasis {
    /// Scribner decimal C table lookup ('Y').
    TableDecimalC,
    /// Factor-based Scribner computation ('N').
    FactorBased,
}

impl ScalingBasis {
    /// Single-character flag used by the volume engine.
    pub fn flag(self) -> char {
        match self {
            ScalingBasis::TableDecimalC => 'Y',
            ScalingBasis::FactorBased => 'N',
        }
    }
}

/// Merchandizing (log-cutting) policy.
///
/// A pure value: constructed once, passed by reference into each
/// calculation, never mutated by the calculator. No cross-field validation
/// is performed here; invalid combinations surface as engine error codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchRules {
    /// Segment-count parity rule.
    pub parity: SegmentParity,
    /// Segmentation option code.
    pub option: SegmentationOption,
    /// Maximum segment length, feet.
    pub max_len: f64,
    /// Minimum segment length, feet.
    pub min_len: f64,
    /// Minimum length for a secondary-product (topwood) segment, feet.
    pub min_len_top: f64,
    /// Minimum whole-tree merchantable length, feet.
    pub merch_len: f64,
    /// Minimum top diameter inside bark, primary product, inches.
    pub min_top_primary: f64,
    /// Minimum top diameter inside bark, secondary product, inches.
    pub min_top_secondary: f64,
    /// Stump height, feet.
    pub stump: f64,
    /// Trim allowance per segment, feet.
    pub trim: f64,
    /// Bark thickness ratio (dib/dob at breast height); 0 = unknown.
    pub bark_ratio: f64,
    /// Double bark thickness at breast height, inches; 0 = unknown.
    pub double_bark: f64,
    /// Minimum merchantable diameter for board-foot volume, inches.
    pub min_bdft_diam: f64,
    /// Board-foot scaling basis.
    pub scaling: ScalingBasis,
}

impl Default for MerchRules {
    fn default() -> Self {
        Self {
            parity: SegmentParity::OddAllowed,
            option: SegmentationOption::NominalShortAlone,
            max_len: 40.0,
            min_len: 12.0,
            min_len_top: 12.0,
            merch_len: 12.0,
            min_top_primary: 5.0,
            min_top_secondary: 2.0,
            stump: 1.0,
            trim: 1.0,
            bark_ratio: 0.0,
            double_bark: 0.0,
            min_bdft_diam: 8.0,
            scaling: ScalingBasis::TableDecimalC,
        }
    }
}
