//! The seam between this crate and the external volume engine.
//!
//! The engine is an opaque numeric oracle: tagged inputs in, fixed-layout
//! buffers and an integer error code out. Everything behind the
//! [`VolumeEngine`] trait is replaceable; the crate ships
//! [`ProfileEngine`], a simplified geometric taper that honors the same
//! buffer contract, for use where no native engine is linked.

pub mod adapter;
pub mod lookup;
pub mod profile;

pub use adapter::VolumeEngineAdapter;
pub use lookup::{EquationLookup, StaticEquationTable};
pub use profile::ProfileEngine;

use crate::models::{CalcMode, MerchRules, RawVolumeResult, TreeInput};

/// Everything the engine needs for one call, marshaled by the adapter.
#[derive(Debug)]
pub struct EngineRequest<'a> {
    /// USFS region code.
    pub region: u8,
    /// Forest identifier, two characters.
    pub forest: &'a str,
    /// District identifier, two characters.
    pub district: &'a str,
    /// Ten-character volume equation identifier.
    pub vol_eq: &'a str,
    /// Product code for the primary product.
    pub product: &'a str,
    /// Calculation mode flag.
    pub mode: CalcMode,
    /// Merchandizing rules in force.
    pub rules: &'a MerchRules,
    /// Tree measurements.
    pub tree: &'a TreeInput,
}

/// The external volume-engine contract.
///
/// Implementations write into `out` (pre-zeroed by the adapter, with
/// explicit log lengths already loaded in variable-length mode) and return
/// an integer error code, 0 on success. Implementations must be pure with
/// respect to the caller: no shared mutable state across calls.
pub trait VolumeEngine {
    fn compute(&self, request: &EngineRequest<'_>, out: &mut RawVolumeResult) -> i32;
}

/// Map an engine error code to its documented message.
pub fn error_message(code: i32) -> &'static str {
    match code {
        0 => "No errors",
        1 => "No volume equation match",
        2 => "No form class",
        3 => "DBH less than one",
        4 => "Tree height less than 4.5",
        5 => "D2H is out of bounds",
        6 => "Illegal primary product log height",
        7 => "Illegal secondary product log height",
        8 => "Illegal upper stem height",
        9 => "Illegal upper stem diameter",
        10 => "Illegal spp code",
        11 => "Illegal equation number",
        12 => "Merch rule conflict",
        13 => "Top diameter greater than DBH",
        14 => "BTR or DBT out of range",
        _ => "Unknown error",
    }
}
