use serde::{Deserialize, Serialize};

use crate::error::VolumeError;
use crate::models::{LogSegment, ProductSummary, MAX_PRODUCT_CLASSES};

/// One product-class bucket: a log qualifies when both its scaling
/// diameter and its length meet the thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductClass {
    pub name: String,
    /// Minimum scaling diameter, inches.
    pub min_diameter: f64,
    /// Minimum log length, feet.
    pub min_length: f64,
}

impl ProductClass {
    pub fn new(name: impl Into<String>, min_diameter: f64, min_length: f64) -> Self {
        Self {
            name: name.into(),
            min_diameter,
            min_length,
        }
    }

    fn matches(&self, diameter: f64, length: f64) -> bool {
        diameter >= self.min_diameter && length >= self.min_length
    }
}

/// Ordered product-class table with first-match-wins classification.
///
/// Table order is semantically significant: classes may overlap, and a log
/// is assigned to the first entry it satisfies, so the table stays a plain
/// list scanned linearly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductTable {
    classes: Vec<ProductClass>,
}

impl Default for ProductTable {
    fn default() -> Self {
        Self {
            classes: vec![
                ProductClass::new("large_saw", 24.0, 16.0),
                ProductClass::new("small_saw", 12.0, 16.0),
                ProductClass::new("chip", 5.0, 8.0),
            ],
        }
    }
}

impl ProductTable {
    pub fn new(classes: Vec<ProductClass>) -> Result<Self, VolumeError> {
        if classes.len() > MAX_PRODUCT_CLASSES {
            return Err(VolumeError::Configuration(format!(
                "at most {MAX_PRODUCT_CLASSES} product classes are supported, got {}",
                classes.len()
            )));
        }
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[ProductClass] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Index of the first class satisfied by both thresholds, or `None`
    /// when the log matches nothing.
    pub fn classify(&self, diameter: f64, length: f64) -> Option<usize> {
        self.classes
            .iter()
            .position(|c| c.matches(diameter, length))
    }

    /// Assign every log to a class (overwriting prior assignments) and
    /// accumulate per-class aggregates. Unmatched logs stay unclassified
    /// and are excluded from every aggregate. Classes with no logs report
    /// all-zero aggregates.
    pub fn aggregate(&self, logs: &mut [LogSegment]) -> Vec<ProductSummary> {
        let mut summaries = vec![ProductSummary::default(); self.classes.len()];
        let mut sum_sq = vec![0.0f64; self.classes.len()];

        for log in logs.iter_mut() {
            log.product_class = self.classify(log.scale_diam, log.length);
            if let Some(idx) = log.product_class {
                let s = &mut summaries[idx];
                s.cuft += log.cuft_gross;
                s.bdft += log.bdft_gross;
                s.length += log.length;
                s.count += 1;
                sum_sq[idx] += log.scale_diam.powi(2);
            }
        }

        for (s, sq) in summaries.iter_mut().zip(sum_sq) {
            if s.count > 0 {
                s.qm_diameter = (sq / s.count as f64).sqrt();
            }
        }
        summaries
    }
}
