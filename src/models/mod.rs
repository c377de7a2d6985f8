pub mod merch_rules;
pub mod results;
pub mod tree;

pub use merch_rules::{MerchRules, ScalingBasis, SegmentParity, SegmentationOption};
pub use results::{diam_field, log_metric, slot};
pub use results::{
    LogSegment, ProductSummary, RawVolumeResult, SanityCorrection, TreeVolumeResult,
    DIAM_FIELDS, LOG_BOUNDARIES, LOG_METRICS, MAX_LOGS, MAX_PRODUCT_CLASSES, SUMMARY_SLOTS,
};
pub use tree::{CalcMode, HeightBasis, TreeInput};
