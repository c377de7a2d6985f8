use colored::Colorize;
use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Cell, ContentArrangement, Table,
};

use crate::calc::{BatchOutput, ProductTable, BATCH_COLUMNS};
use crate::models::TreeVolumeResult;

/// Format the single-tree volume report as a string.
pub fn format_volume_report(
    species: &str,
    vol_eq: &str,
    dbh: f64,
    form_class: i32,
    total_height: f64,
    result: &TreeVolumeResult,
) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Volume Report".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));
    output.push_str(&format!("Species: {species}   Equation: {vol_eq}\n"));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Metric", "Value"]);

    table.add_row(vec![Cell::new("DBH (in)"), Cell::new(format!("{dbh:.1}"))]);
    table.add_row(vec![
        Cell::new("Form Class"),
        Cell::new(format!("{form_class}")),
    ]);
    table.add_row(vec![
        Cell::new("Total Ht (ft)"),
        Cell::new(format!("{total_height:.0}")),
    ]);
    table.add_row(vec![
        Cell::new("Merch Ht (ft)"),
        Cell::new(format!("{:.0}", result.merch_height)),
    ]);
    table.add_row(vec![
        Cell::new("CuFt Total"),
        Cell::new(format!("{:.2}", result.cuft_total())),
    ]);
    table.add_row(vec![
        Cell::new("CuFt Merch"),
        Cell::new(format!("{:.2}", result.cuft_merch())),
    ]);
    table.add_row(vec![
        Cell::new("BdFt Merch"),
        Cell::new(format!("{:.1}", result.bdft_merch())),
    ]);
    table.add_row(vec![
        Cell::new("CuFt Top"),
        Cell::new(format!("{:.2}", result.cuft_topwood())),
    ]);
    table.add_row(vec![
        Cell::new("CuFt Stump"),
        Cell::new(format!("{:.2}", result.cuft_stump())),
    ]);
    table.add_row(vec![
        Cell::new("CuFt Tip"),
        Cell::new(format!("{:.2}", result.cuft_tip())),
    ]);

    output.push_str(&format!("{table}\n"));

    if !result.is_ok() {
        output.push_str(&format!(
            "{}\n",
            format!(
                "Engine error {}: {}",
                result.error_code,
                result.error_message()
            )
            .red()
        ));
    }
    output
}

/// Print the single-tree volume report.
pub fn print_volume_report(
    species: &str,
    vol_eq: &str,
    dbh: f64,
    form_class: i32,
    total_height: f64,
    result: &TreeVolumeResult,
) {
    print!(
        "{}",
        format_volume_report(species, vol_eq, dbh, form_class, total_height, result)
    );
}

/// Format the per-log detail table as a string.
pub fn format_log_table(result: &TreeVolumeResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Log Detail".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    if result.logs.is_empty() {
        output.push_str("No merchantable logs.\n");
        return output;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Log", "Bole Ht", "Length", "Lg DIB", "Sm DIB", "Scale", "CuFt", "BdFt", "Intl",
            "Class",
        ]);

    for log in &result.logs {
        table.add_row(vec![
            Cell::new(format!("{}", log.position)),
            Cell::new(format!("{:.1}", log.bole_height)),
            Cell::new(format!("{:.1}", log.length)),
            Cell::new(format!("{:.1}", log.large_dib)),
            Cell::new(format!("{:.1}", log.small_dib)),
            Cell::new(format!("{:.0}", log.scale_diam)),
            Cell::new(format!("{:.2}", log.cuft_gross)),
            Cell::new(format!("{:.1}", log.bdft_gross)),
            Cell::new(format!("{:.1}", log.intl_gross)),
            Cell::new(
                log.product_class
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }

    output.push_str(&format!("{table}\n"));
    output
}

pub fn print_log_table(result: &TreeVolumeResult) {
    print!("{}", format_log_table(result));
}

/// Format the per-product-class summary as a string.
pub fn format_product_table(table_def: &ProductTable, result: &TreeVolumeResult) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Products".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Class", "Logs", "CuFt", "BdFt", "Length", "QM Diam"]);

    for (class, summary) in table_def.classes().iter().zip(&result.products) {
        table.add_row(vec![
            Cell::new(&class.name),
            Cell::new(format!("{}", summary.count)),
            Cell::new(format!("{:.2}", summary.cuft)),
            Cell::new(format!("{:.1}", summary.bdft)),
            Cell::new(format!("{:.1}", summary.length)),
            Cell::new(format!("{:.1}", summary.qm_diameter)),
        ]);
    }

    output.push_str(&format!("{table}\n"));
    output
}

pub fn print_product_table(table_def: &ProductTable, result: &TreeVolumeResult) {
    print!("{}", format_product_table(table_def, result));
}

/// Format batch results as a table, one row per tree.
pub fn format_batch_table(output_rows: &BatchOutput) -> String {
    let mut output = String::new();
    output.push_str(&format!("\n{}\n", "Batch Results".bold().green()));
    output.push_str(&format!("{}\n", "=".repeat(50)));

    let mut table = Table::new();
    let mut header = vec!["tree".to_string()];
    header.extend(BATCH_COLUMNS.iter().map(|c| c.to_string()));
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for (i, row) in output_rows.rows.iter().enumerate() {
        table.add_row(vec![
            Cell::new(format!("{i}")),
            Cell::new(format!("{:.2}", row.cuft_total)),
            Cell::new(format!("{:.2}", row.cuft_merch)),
            Cell::new(format!("{:.1}", row.bdft_merch)),
            Cell::new(format!("{:.1}", row.merch_height)),
            Cell::new(format!("{}", row.num_logs)),
            Cell::new(format!("{}", row.error_code)),
        ]);
    }

    output.push_str(&format!("{table}\n"));
    output
}

pub fn print_batch_table(output_rows: &BatchOutput) {
    print!("{}", format_batch_table(output_rows));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::{BatchRow, ProductClass};
    use crate::models::LogSegment;

    fn sample_result() -> TreeVolumeResult {
        TreeVolumeResult {
            summary: vec![0.0; crate::models::SUMMARY_SLOTS],
            merch_height: 101.2,
            num_logs: 1,
            num_logs_primary: 1.0,
            num_logs_secondary: 0.0,
            error_code: 0,
            logs: vec![LogSegment {
                position: 1,
                bole_height: 42.0,
                length: 40.0,
                large_dib: 17.4,
                large_dob: 19.0,
                small_dib: 16.3,
                small_dob: 17.8,
                scale_diam: 16.0,
                cuft_gross: 55.0,
                bdft_gross: 280.0,
                intl_gross: 300.0,
                product_class: Some(0),
            }],
            products: vec![Default::default()],
            corrections: Vec::new(),
            dry_biomass: Vec::new(),
            green_biomass: Vec::new(),
        }
    }

    #[test]
    fn test_volume_report_contains_metrics() {
        let out = format_volume_report("DF", "F01FW2W202", 18.0, 80, 120.0, &sample_result());
        assert!(out.contains("Volume Report"));
        assert!(out.contains("F01FW2W202"));
        assert!(out.contains("Merch Ht"));
        assert!(!out.contains("Engine error"));
    }

    #[test]
    fn test_volume_report_shows_engine_error() {
        let mut result = sample_result();
        result.error_code = 4;
        let out = format_volume_report("DF", "F01FW2W202", 18.0, 80, 3.0, &result);
        assert!(out.contains("Engine error 4"));
        assert!(out.contains("Tree height less than 4.5"));
    }

    #[test]
    fn test_log_table_lists_each_log() {
        let out = format_log_table(&sample_result());
        assert!(out.contains("Log Detail"));
        assert!(out.contains("40.0"));
        assert!(out.contains("16"));
    }

    #[test]
    fn test_log_table_empty() {
        let mut result = sample_result();
        result.logs.clear();
        let out = format_log_table(&result);
        assert!(out.contains("No merchantable logs"));
    }

    #[test]
    fn test_product_table_rows_follow_definition() {
        let table = ProductTable::new(vec![ProductClass::new("saw", 12.0, 16.0)]).unwrap();
        let out = format_product_table(&table, &sample_result());
        assert!(out.contains("saw"));
        assert!(out.contains("QM Diam"));
    }

    #[test]
    fn test_batch_table_one_row_per_tree() {
        let batch = BatchOutput {
            rows: vec![BatchRow::default(), BatchRow::default()],
            products: Vec::new(),
        };
        let out = format_batch_table(&batch);
        assert!(out.contains("Batch Results"));
        assert!(out.contains("cuft_total"));
    }
}
