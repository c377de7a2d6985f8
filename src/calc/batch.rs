use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::calc::calculator::VolumeCalculator;
use crate::error::VolumeError;
use crate::models::{ProductSummary, TreeInput};

/// Column labels for [`BatchRow`], in output order.
pub const BATCH_COLUMNS: [&str; 6] = [
    "cuft_total",
    "cuft_merch",
    "bdft_merch",
    "merch_height",
    "num_logs",
    "error_code",
];

/// One output row of a batch evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchRow {
    pub cuft_total: f64,
    pub cuft_merch: f64,
    pub bdft_merch: f64,
    pub merch_height: f64,
    pub num_logs: usize,
    pub error_code: i32,
}

impl BatchRow {
    /// The six summary metrics as a numeric row, matching
    /// [`BATCH_COLUMNS`].
    pub fn values(&self) -> [f64; 6] {
        [
            self.cuft_total,
            self.cuft_merch,
            self.bdft_merch,
            self.merch_height,
            self.num_logs as f64,
            self.error_code as f64,
        ]
    }
}

/// Fixed-shape result of a batch evaluation: row `i` always corresponds
/// to input tree `i`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    pub rows: Vec<BatchRow>,
    /// Per-tree product aggregates, parallel to `rows`. Empty when product
    /// aggregation is disabled on the calculator.
    pub products: Vec<Vec<ProductSummary>>,
}

/// Vectorized driver over parallel per-tree input slices.
///
/// Failures are isolated per tree: a bad row is zero-filled (with its
/// error code recorded) and the batch continues. Only malformed batch
/// input itself, such as mismatched slice lengths, aborts the run.
pub struct BatchEvaluator {
    calculator: VolumeCalculator,
}

impl BatchEvaluator {
    pub fn new(calculator: VolumeCalculator) -> Self {
        Self { calculator }
    }

    pub fn calculator(&self) -> &VolumeCalculator {
        &self.calculator
    }

    /// Evaluate every tree in the parallel slices `dbh` / `total_height` /
    /// optional `form_class` (defaulting to zero per tree when omitted).
    pub fn evaluate(
        &mut self,
        dbh: &[f64],
        total_height: &[f64],
        form_class: Option<&[f64]>,
    ) -> Result<BatchOutput, VolumeError> {
        if dbh.len() != total_height.len() {
            return Err(VolumeError::Configuration(format!(
                "dbh and height slices differ in length: {} vs {}",
                dbh.len(),
                total_height.len()
            )));
        }
        if let Some(fc) = form_class {
            if fc.len() != dbh.len() {
                return Err(VolumeError::Configuration(format!(
                    "form class slice length {} does not match tree count {}",
                    fc.len(),
                    dbh.len()
                )));
            }
        }

        let n_products = self
            .calculator
            .config()
            .product_table
            .as_ref()
            .map(|t| t.len())
            .unwrap_or(0);

        let mut rows = Vec::with_capacity(dbh.len());
        let mut products = Vec::with_capacity(dbh.len());

        for i in 0..dbh.len() {
            let mut tree = TreeInput::new(dbh[i], total_height[i]);
            if let Some(fc) = form_class {
                tree.form_class = fc[i] as i32;
            }

            match self.calculator.calc(&tree) {
                Ok(result) if result.is_ok() => {
                    rows.push(BatchRow {
                        cuft_total: result.cuft_total(),
                        cuft_merch: result.cuft_merch(),
                        bdft_merch: result.bdft_merch(),
                        merch_height: result.merch_height,
                        num_logs: result.num_logs,
                        error_code: 0,
                    });
                    products.push(result.products);
                }
                Ok(result) => {
                    warn!(
                        tree = i,
                        code = result.error_code,
                        message = result.error_message(),
                        "tree failed, zero-filling row"
                    );
                    rows.push(BatchRow {
                        error_code: result.error_code,
                        ..BatchRow::default()
                    });
                    products.push(vec![ProductSummary::default(); n_products]);
                }
                Err(err) => {
                    warn!(tree = i, %err, "tree rejected before engine call, zero-filling row");
                    rows.push(BatchRow {
                        error_code: -1,
                        ..BatchRow::default()
                    });
                    products.push(vec![ProductSummary::default(); n_products]);
                }
            }
        }

        if n_products == 0 {
            products.clear();
        }
        Ok(BatchOutput { rows, products })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::calculator::CalculatorConfig;
    use crate::calc::products::{ProductClass, ProductTable};
    use crate::engine::ProfileEngine;

    fn evaluator(product_table: Option<ProductTable>) -> BatchEvaluator {
        let config = CalculatorConfig {
            vol_eq: "F01FW2W202".to_string(),
            product_table,
            ..CalculatorConfig::default()
        };
        BatchEvaluator::new(VolumeCalculator::new(Box::new(ProfileEngine::new()), config))
    }

    #[test]
    fn test_row_count_matches_input() {
        let mut batch = evaluator(None);
        let out = batch
            .evaluate(&[18.0, 24.0, 12.0], &[120.0, 150.0, 80.0], None)
            .unwrap();
        assert_eq!(out.rows.len(), 3);
        assert!(out.products.is_empty());
    }

    #[test]
    fn test_rows_preserve_input_order() {
        let mut batch = evaluator(None);
        let out = batch
            .evaluate(&[24.0, 12.0], &[150.0, 80.0], None)
            .unwrap();
        // The bigger tree comes first, exactly as in the input.
        assert!(out.rows[0].cuft_total > out.rows[1].cuft_total);
    }

    #[test]
    fn test_failed_row_zero_filled_and_batch_continues() {
        let mut batch = evaluator(None);
        // Middle tree is too short: engine error 4.
        let out = batch
            .evaluate(&[18.0, 12.0, 24.0], &[120.0, 3.0, 150.0], None)
            .unwrap();
        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.rows[1].error_code, 4);
        assert_eq!(out.rows[1].cuft_total, 0.0);
        assert_eq!(out.rows[1].num_logs, 0);
        assert!(out.rows[0].cuft_total > 0.0);
        assert!(out.rows[2].cuft_total > 0.0);
    }

    #[test]
    fn test_length_mismatch_is_configuration_error() {
        let mut batch = evaluator(None);
        let err = batch.evaluate(&[18.0, 24.0], &[120.0], None).unwrap_err();
        assert!(matches!(err, VolumeError::Configuration(_)));
    }

    #[test]
    fn test_form_class_length_mismatch_rejected() {
        let mut batch = evaluator(None);
        let err = batch
            .evaluate(&[18.0, 24.0], &[120.0, 150.0], Some(&[80.0]))
            .unwrap_err();
        assert!(matches!(err, VolumeError::Configuration(_)));
    }

    #[test]
    fn test_form_class_applied_per_tree() {
        let mut batch = evaluator(None);
        let with_fc = batch
            .evaluate(&[18.0], &[120.0], Some(&[65.0]))
            .unwrap();
        let without = batch.evaluate(&[18.0], &[120.0], None).unwrap();
        // Lower form class means faster taper and less volume.
        assert!(with_fc.rows[0].cuft_total < without.rows[0].cuft_total);
    }

    #[test]
    fn test_product_tables_parallel_to_rows() {
        let table = ProductTable::new(vec![
            ProductClass::new("saw", 12.0, 16.0),
            ProductClass::new("chip", 5.0, 8.0),
        ])
        .unwrap();
        let mut batch = evaluator(Some(table));
        let out = batch
            .evaluate(&[18.0, 12.0, 24.0], &[120.0, 3.0, 150.0], None)
            .unwrap();
        assert_eq!(out.products.len(), 3);
        assert_eq!(out.products[0].len(), 2);
        // Failed row reports all-zero product aggregates.
        assert!(out.products[1].iter().all(|p| p.count == 0 && p.cuft == 0.0));
        assert!(out.products[2].iter().any(|p| p.count > 0));
    }

    #[test]
    fn test_empty_batch() {
        let mut batch = evaluator(None);
        let out = batch.evaluate(&[], &[], None).unwrap();
        assert!(out.rows.is_empty());
    }

    #[test]
    fn test_batch_row_values_order() {
        let row = BatchRow {
            cuft_total: 1.0,
            cuft_merch: 2.0,
            bdft_merch: 3.0,
            merch_height: 4.0,
            num_logs: 5,
            error_code: 6,
        };
        assert_eq!(row.values(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(BATCH_COLUMNS.len(), row.values().len());
    }
}
