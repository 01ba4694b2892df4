use crate::core::encoding::decode_text;
use crate::domain::model::{Outcome, Reconciliation, Record, RejectedRecord};
use crate::domain::ports::RecordProcessor;
use crate::domain::schema::Schema;
use crate::utils::error::Result;
use std::path::Path;

pub const INVALID_FORMAT: &str = "invalid format";

/// Classifies every row of one staged file as accepted or rejected.
pub struct Reconciler<'a, P: RecordProcessor> {
    schema: &'a Schema,
    processor: &'a P,
}

impl<'a, P: RecordProcessor> Reconciler<'a, P> {
    pub fn new(schema: &'a Schema, processor: &'a P) -> Self {
        Self { schema, processor }
    }

    /// Fails only when the file itself cannot be read or parsed; bad rows
    /// end up in `errors`.
    pub async fn reconcile_file(&self, path: &Path) -> Result<Reconciliation> {
        let bytes = tokio::fs::read(path).await?;
        let (text, detected) = decode_text(&bytes);
        tracing::debug!(
            "Decoded {} as {} ({:?})",
            path.display(),
            detected.name(),
            detected.source
        );

        let (header, records) = self.parse(&text)?;
        let mut result = Reconciliation {
            header,
            ok: Vec::new(),
            errors: Vec::new(),
            encoding: detected.name(),
            remote_calls: 0,
        };

        let columns = match self.schema.resolve_header(result.header.as_deref().unwrap_or(&[])) {
            Ok(columns) => columns,
            Err(missing) => {
                tracing::warn!(
                    "❌ {} rejected: missing required columns {:?}",
                    path.display(),
                    missing
                );
                let width = result.header.as_ref().map_or(0, Vec::len);
                result.errors.push(RejectedRecord {
                    record: Record {
                        position: 0,
                        fields: vec![String::new(); width],
                    },
                    reason: format!("CSV file is missing required columns: {}", missing.join(", ")),
                });
                return Ok(result);
            }
        };

        let width = self.schema.expected_width(result.header.as_deref());
        tracing::info!("Total record(s) to process: {}", records.len());

        for record in records {
            if record.fields.len() != width {
                tracing::debug!(
                    "Row {}: {} fields, expected {}",
                    record.position,
                    record.fields.len(),
                    width
                );
                result.errors.push(RejectedRecord {
                    record,
                    reason: INVALID_FORMAT.to_string(),
                });
                continue;
            }

            let prepared = match self.schema.prepare(&record, columns.as_ref()) {
                Ok(prepared) => prepared,
                Err(reason) => {
                    tracing::debug!("Row {}: coercion failed", record.position);
                    result.errors.push(RejectedRecord { record, reason });
                    continue;
                }
            };

            result.remote_calls += 1;
            match self.processor.process(&prepared).await {
                Outcome::Success => {
                    tracing::debug!("Row {}: accepted", record.position);
                    result.ok.push(record);
                }
                Outcome::Failure(reason) => {
                    tracing::debug!("Row {}: rejected", record.position);
                    result.errors.push(RejectedRecord { record, reason });
                }
            }
        }

        tracing::info!(
            "Reconciled {}: {} ok, {} error(s)",
            path.display(),
            result.ok.len(),
            result.errors.len()
        );
        Ok(result)
    }

    fn parse(&self, text: &str) -> Result<(Option<Vec<String>>, Vec<Record>)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.schema.delimiter())
            .has_headers(self.schema.has_header())
            .flexible(true)
            .from_reader(text.as_bytes());

        let header = if self.schema.has_header() {
            Some(reader.headers()?.iter().map(str::to_string).collect())
        } else {
            None
        };

        let mut records = Vec::new();
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            records.push(Record {
                position: index + 1,
                fields: row.iter().map(str::to_string).collect(),
            });
        }
        Ok((header, records))
    }
}
