use serde::{Deserialize, Serialize};

/// Engine buffer capacities. These are contract constants of the external
/// volume engine; exceeding them is undefined behavior on the engine side,
/// so every write on this side is bounds-checked against them.
pub const SUMMARY_SLOTS: usize = 15;
pub const MAX_LOGS: usize = 20;
pub const LOG_BOUNDARIES: usize = 21;
pub const LOG_METRICS: usize = 7;
pub const DIAM_FIELDS: usize = 3;
pub const MAX_PRODUCT_CLASSES: usize = 10;

/// Named indices into the 15-slot volume summary. Position encodes metric
/// identity; the layout is fixed by the engine contract.
pub mod slot {
    pub const CUFT_TOTAL: usize = 0;
    pub const BDFT_GROSS_PRIM: usize = 1;
    pub const BDFT_NET_PRIM: usize = 2;
    pub const CUFT_GROSS_PRIM: usize = 3;
    pub const CUFT_NET_PRIM: usize = 4;
    pub const CORDS_PRIM: usize = 5;
    pub const CUFT_GROSS_SEC: usize = 6;
    pub const CUFT_NET_SEC: usize = 7;
    pub const CORDS_SEC: usize = 8;
    pub const BDFT_GROSS_INTL: usize = 9;
    pub const BDFT_NET_INTL: usize = 10;
    pub const BDFT_GROSS_SEC: usize = 11;
    pub const BDFT_NET_SEC: usize = 12;
    pub const CUFT_STUMP: usize = 13;
    pub const CUFT_TIP: usize = 14;
}

/// Rows of the per-log volume table. Only a subset is read back here; the
/// remaining rows are engine-internal metrics carried through untouched.
pub mod log_metric {
    pub const GROSS_BDFT: usize = 0;
    pub const NET_BDFT: usize = 1;
    pub const GROSS_CUFT: usize = 3;
    pub const NET_CUFT: usize = 4;
    pub const GROSS_INTL: usize = 6;
}

/// Columns of the per-boundary diameter table.
pub mod diam_field {
    pub const SCALE: usize = 0;
    pub const INSIDE_BARK: usize = 1;
    pub const OUTSIDE_BARK: usize = 2;
}

/// Raw fixed-capacity output of one volume-engine call.
///
/// Slot indices are meaning-bearing (see [`slot`], [`log_metric`],
/// [`diam_field`]); this is a wire format, not an open schema.
#[derive(Debug, Clone)]
pub struct RawVolumeResult {
    /// Tree-level volume summary.
    pub summary: [f64; SUMMARY_SLOTS],
    /// Per-log volume table: `log_vol[metric][log]`.
    pub log_vol: [[f64; MAX_LOGS]; LOG_METRICS],
    /// Per-boundary diameter table: `log_diam[boundary][field]`.
    pub log_diam: [[f64; DIAM_FIELDS]; LOG_BOUNDARIES],
    /// Per-log lengths.
    pub log_len: [f64; MAX_LOGS],
    /// Bole height at each log boundary; index 0 is the stump top.
    pub bole_height: [f64; LOG_BOUNDARIES],
    /// Number of merchandized logs.
    pub num_logs: usize,
    /// Primary-product log count (the engine reports this as a float).
    pub num_logs_primary: f64,
    /// Secondary-product log count.
    pub num_logs_secondary: f64,
    /// Dry biomass components, pounds.
    pub dry_biomass: [f64; SUMMARY_SLOTS],
    /// Green biomass components, pounds.
    pub green_biomass: [f64; SUMMARY_SLOTS],
    /// Engine error flag; 0 means success.
    pub error_flag: i32,
}

impl Default for RawVolumeResult {
    fn default() -> Self {
        Self {
            summary: [0.0; SUMMARY_SLOTS],
            log_vol: [[0.0; MAX_LOGS]; LOG_METRICS],
            log_diam: [[0.0; DIAM_FIELDS]; LOG_BOUNDARIES],
            log_len: [0.0; MAX_LOGS],
            bole_height: [0.0; LOG_BOUNDARIES],
            num_logs: 0,
            num_logs_primary: 0.0,
            num_logs_secondary: 0.0,
            dry_biomass: [0.0; SUMMARY_SLOTS],
            green_biomass: [0.0; SUMMARY_SLOTS],
            error_flag: 0,
        }
    }
}

impl RawVolumeResult {
    /// Zero every buffer ahead of the next engine call.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One merchandized log, derived from a [`RawVolumeResult`] row. Immutable
/// once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSegment {
    /// 1-based position from the stump up.
    pub position: usize,
    /// Bole height at the top of this log, feet.
    pub bole_height: f64,
    /// Scaled log length, feet.
    pub length: f64,
    /// Large-end diameter inside bark, inches.
    pub large_dib: f64,
    /// Large-end diameter outside bark, inches.
    pub large_dob: f64,
    /// Small-end diameter inside bark, inches.
    pub small_dib: f64,
    /// Small-end diameter outside bark, inches.
    pub small_dob: f64,
    /// Scaling diameter (rounded small-end dib), inches.
    pub scale_diam: f64,
    /// Gross cubic-foot volume.
    pub cuft_gross: f64,
    /// Gross Scribner board-foot volume.
    pub bdft_gross: f64,
    /// Gross International 1/4-inch board-foot volume.
    pub intl_gross: f64,
    /// Index into the product-class table, when classified.
    pub product_class: Option<usize>,
}

impl LogSegment {
    /// Build log `index` (0-based) from the raw tables.
    ///
    /// Large-end diameters come from boundary `index`, small-end diameters
    /// from boundary `index + 1`.
    pub fn from_raw(raw: &RawVolumeResult, index: usize) -> Self {
        debug_assert!(index < raw.num_logs && index < MAX_LOGS);
        let large = &raw.log_diam[index];
        let small = &raw.log_diam[index + 1];
        Self {
            position: index + 1,
            bole_height: raw.bole_height[index + 1],
            length: raw.log_len[index],
            large_dib: large[diam_field::INSIDE_BARK],
            large_dob: large[diam_field::OUTSIDE_BARK],
            small_dib: small[diam_field::INSIDE_BARK],
            small_dob: small[diam_field::OUTSIDE_BARK],
            scale_diam: small[diam_field::SCALE],
            cuft_gross: raw.log_vol[log_metric::GROSS_CUFT][index],
            bdft_gross: raw.log_vol[log_metric::GROSS_BDFT][index],
            intl_gross: raw.log_vol[log_metric::GROSS_INTL][index],
            product_class: None,
        }
    }
}

/// Running aggregates for one product class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Summed gross cubic-foot volume.
    pub cuft: f64,
    /// Summed gross board-foot volume.
    pub bdft: f64,
    /// Summed log length, feet.
    pub length: f64,
    /// Number of logs assigned.
    pub count: usize,
    /// Quadratic mean scaling diameter, inches; 0 when the class is empty.
    pub qm_diameter: f64,
}

/// A numeric correction applied by the sanity pass after an engine call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SanityCorrection {
    /// A negative summary slot was clamped to zero.
    NegativeSlotClamped { slot: usize },
    /// DBH < 1: the summary was zeroed and the total-volume slot replaced
    /// with a cone approximation.
    ConeSubstituted,
    /// The tip slot exceeded twice the cone volume and was zeroed.
    TipZeroed,
    /// The total-volume slot exceeded twice the check volume and was
    /// clamped down to the check volume.
    TotalClamped,
}

/// Typed per-tree output of [`crate::VolumeCalculator::calc`].
///
/// Rebuilt in full on every call; nothing is merged from prior state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeVolumeResult {
    /// The corrected 15-slot volume summary.
    pub summary: Vec<f64>,
    /// Merchantable height (bole height at the end of the primary
    /// product), feet.
    pub merch_height: f64,
    /// Number of merchandized logs.
    pub num_logs: usize,
    /// Primary-product log count.
    pub num_logs_primary: f64,
    /// Secondary-product log count.
    pub num_logs_secondary: f64,
    /// Engine error code; 0 means success.
    pub error_code: i32,
    /// Merchandized logs in stem order.
    pub logs: Vec<LogSegment>,
    /// Per-class aggregates, parallel to the product table. Empty when
    /// product aggregation is disabled.
    pub products: Vec<ProductSummary>,
    /// Sanity corrections applied to the raw summary.
    pub corrections: Vec<SanityCorrection>,
    /// Dry biomass components, pounds.
    pub dry_biomass: Vec<f64>,
    /// Green biomass components, pounds.
    pub green_biomass: Vec<f64>,
}

impl TreeVolumeResult {
    pub fn cuft_total(&self) -> f64 {
        self.summary[slot::CUFT_TOTAL]
    }

    pub fn cuft_merch(&self) -> f64 {
        self.summary[slot::CUFT_GROSS_PRIM]
    }

    pub fn bdft_merch(&self) -> f64 {
        self.summary[slot::BDFT_GROSS_PRIM]
    }

    pub fn cuft_topwood(&self) -> f64 {
        self.summary[slot::CUFT_GROSS_SEC]
    }

    pub fn cuft_stump(&self) -> f64 {
        self.summary[slot::CUFT_STUMP]
    }

    pub fn cuft_tip(&self) -> f64 {
        self.summary[slot::CUFT_TIP]
    }

    /// True when the engine reported success.
    pub fn is_ok(&self) -> bool {
        self.error_code == 0
    }

    /// Human-readable engine status.
    pub fn error_message(&self) -> &'static str {
        crate::engine::error_message(self.error_code)
    }
}
