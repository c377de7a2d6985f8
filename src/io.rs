use std::io::Read;
use std::path::Path;

use crate::calc::BatchOutput;
use crate::error::VolumeError;

/// CSV row structure for batch tree input.
#[derive(Debug, serde::Deserialize, serde::Serialize)]
struct BatchInputRow {
    dbh: f64,
    height: f64,
    form_class: Option<f64>,
}

/// Parallel input slices for a batch evaluation.
#[derive(Debug, Clone, Default)]
pub struct BatchInput {
    pub dbh: Vec<f64>,
    pub height: Vec<f64>,
    /// Present only when at least one row carried a form class; missing
    /// rows default to zero.
    pub form_class: Option<Vec<f64>>,
}

fn parse_batch_records<R: Read>(rdr: &mut csv::Reader<R>) -> Result<BatchInput, VolumeError> {
    let mut dbh = Vec::new();
    let mut height = Vec::new();
    let mut form_class = Vec::new();
    let mut any_form = false;

    for result in rdr.deserialize() {
        let row: BatchInputRow = result?;
        dbh.push(row.dbh);
        height.push(row.height);
        if row.form_class.is_some() {
            any_form = true;
        }
        form_class.push(row.form_class.unwrap_or(0.0));
    }

    Ok(BatchInput {
        dbh,
        height,
        form_class: any_form.then_some(form_class),
    })
}

/// Read batch tree measurements from a CSV file with `dbh,height` and an
/// optional `form_class` column.
pub fn read_batch_csv(path: impl AsRef<Path>) -> Result<BatchInput, VolumeError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path.as_ref())?;
    parse_batch_records(&mut rdr)
}

/// Read batch tree measurements from CSV bytes.
pub fn read_batch_csv_from_bytes(data: &[u8]) -> Result<BatchInput, VolumeError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);
    parse_batch_records(&mut rdr)
}

/// Write batch results to a CSV file, one row per input tree.
pub fn write_batch_csv(output: &BatchOutput, path: impl AsRef<Path>) -> Result<(), VolumeError> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for row in &output.rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Serialize batch results as pretty JSON (rows plus product tables).
pub fn batch_to_json(output: &BatchOutput) -> Result<String, VolumeError> {
    Ok(serde_json::to_string_pretty(output)?)
}
