use serde::{Deserialize, Serialize};

use crate::error::VolumeError;

/// How the tree height measurement should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightBasis {
    /// Total height from ground to tip ('F').
    Total,
    /// Height expressed in logs ('L').
    Logs,
}

impl HeightBasis {
    pub fn flag(self) -> char {
        match self {
            HeightBasis::Total => 'F',
            HeightBasis::Logs => 'L',
        }
    }
}

/// Calculation mode: engine-driven merchandizing versus explicit
/// user-assigned log lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalcMode {
    /// Cruise mode ('C'): the engine segments the stem per the merch rules.
    Cruise,
    /// Variable-length mode ('V'): the caller supplies the log lengths.
    VariableLength,
}

impl CalcMode {
    pub fn flag(self) -> char {
        match self {
            CalcMode::Cruise => 'C',
            CalcMode::VariableLength => 'V',
        }
    }
}

/// Per-tree measurement snapshot passed into a volume calculation.
///
/// Zero is the "not measured" sentinel for the numeric fields, matching
/// the engine's calling convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeInput {
    /// Diameter at breast height, outside bark, inches.
    pub dbh_ob: f64,
    /// Root-collar diameter, outside bark, inches (woodland species).
    pub drc_ob: f64,
    /// Total height, feet.
    pub total_height: f64,
    /// Interpretation of the height measurement.
    pub height_basis: HeightBasis,
    /// Height to the primary-product top, feet (0 = let the engine derive).
    pub height_primary: f64,
    /// Height to the secondary-product top, feet.
    pub height_secondary: f64,
    /// First upper-stem measurement point: (height ft, diameter in).
    pub upper_stem1: Option<(f64, f64)>,
    /// Second upper-stem measurement point: (height ft, diameter in).
    pub upper_stem2: Option<(f64, f64)>,
    /// Reference position code for the upper-stem heights.
    pub height_ref: i32,
    /// Girard form class (0 = unknown).
    pub form_class: i32,
    /// Double bark thickness at breast height, inches.
    pub double_bark: f64,
    /// Bark ratio (dib/dob) at breast height; 0 = unknown.
    pub bark_ratio: f64,
    /// Crown ratio (0.0 - 1.0).
    pub crown_ratio: f64,
    /// Cull fraction (0.0 - 1.0).
    pub cull: f64,
    /// Decay class code (dead trees).
    pub decay_code: i32,
    /// Broken-top height, feet (0 = intact).
    pub broken_height: f64,
    /// Diameter at the broken top, inches.
    pub broken_diameter: f64,
    /// FIA species code (e.g. 202 for Douglas-fir).
    pub species: u16,
    /// Live/dead flag.
    pub live: bool,
    /// Explicit log lengths for [`CalcMode::VariableLength`], in cutting
    /// order from the stump up.
    pub log_lengths: Vec<f64>,
}

impl Default for TreeInput {
    fn default() -> Self {
        Self {
            dbh_ob: 0.0,
            drc_ob: 0.0,
            total_height: 0.0,
            height_basis: HeightBasis::Total,
            height_primary: 0.0,
            height_secondary: 0.0,
            upper_stem1: None,
            upper_stem2: None,
            height_ref: 0,
            form_class: 0,
            double_bark: 0.0,
            bark_ratio: 0.0,
            crown_ratio: 0.0,
            cull: 0.0,
            decay_code: 0,
            broken_height: 0.0,
            broken_diameter: 0.0,
            species: 0,
            live: true,
            log_lengths: Vec::new(),
        }
    }
}

impl TreeInput {
    /// Shorthand for the common cruise-mode case.
    pub fn new(dbh_ob: f64, total_height: f64) -> Self {
        Self {
            dbh_ob,
            total_height,
            ..Self::default()
        }
    }

    /// Check the explicit log-length list required by variable-length mode.
    ///
    /// The list must be non-empty and contain no non-positive entry before
    /// the first zero terminator.
    pub fn validate_log_lengths(&self) -> Result<(), VolumeError> {
        let lengths: Vec<f64> = self
            .log_lengths
            .iter()
            .copied()
            .take_while(|&l| l != 0.0)
            .collect();
        if lengths.is_empty() {
            return Err(VolumeError::Configuration(
                "variable-length mode requires a non-empty log length list".to_string(),
            ));
        }
        if let Some(bad) = lengths.iter().find(|&&l| l < 0.0) {
            return Err(VolumeError::Configuration(format!(
                "log lengths must be positive, got {bad}"
            )));
        }
        Ok(())
    }
}
