use crate::domain::model::{BatchItem, OutputPair, Reconciliation};
use crate::domain::schema::Schema;
use crate::utils::error::Result;
use std::path::Path;

pub const ERROR_COLUMN: &str = "ERROR";

/// Writes `<stem>_ok.csv` into `processed_dir` and `<stem>_error.csv` into
/// `error_dir`. Both files are always written, as UTF-8, even when empty.
pub fn write_outputs(
    item: &BatchItem,
    result: &Reconciliation,
    schema: &Schema,
    processed_dir: &Path,
    error_dir: &Path,
) -> Result<OutputPair> {
    std::fs::create_dir_all(processed_dir)?;
    std::fs::create_dir_all(error_dir)?;

    let pair = OutputPair {
        ok_path: processed_dir.join(item.ok_filename()),
        error_path: error_dir.join(item.error_filename()),
    };

    let mut ok_writer = writer_for(&pair.ok_path, schema)?;
    if let Some(header) = &result.header {
        ok_writer.write_record(header)?;
    }
    for record in &result.ok {
        ok_writer.write_record(&record.fields)?;
    }
    ok_writer.flush()?;

    let mut error_writer = writer_for(&pair.error_path, schema)?;
    if let Some(header) = &result.header {
        error_writer.write_record(header.iter().map(String::as_str).chain([ERROR_COLUMN]))?;
    }
    for rejected in &result.errors {
        error_writer.write_record(
            rejected
                .record
                .fields
                .iter()
                .map(String::as_str)
                .chain([rejected.reason.as_str()]),
        )?;
    }
    error_writer.flush()?;

    tracing::info!(
        "Saved {} record(s) to {} and {} record(s) to {}",
        result.ok.len(),
        item.ok_filename(),
        result.errors.len(),
        item.error_filename()
    );
    Ok(pair)
}

fn writer_for(path: &Path, schema: &Schema) -> Result<csv::Writer<std::fs::File>> {
    Ok(csv::WriterBuilder::new()
        .delimiter(schema.delimiter())
        .flexible(true)
        .from_path(path)?)
}
