use anyhow::Result;
use async_trait::async_trait;
use recon_etl::core::reconciler::{Reconciler, INVALID_FORMAT};
use recon_etl::domain::cede_columns::CEDE_INTERFACE_COLUMNS;
use recon_etl::domain::model::{Outcome, PreparedRecord};
use recon_etl::domain::ports::RecordProcessor;
use recon_etl::domain::schema::{cede_interface_schema, exchange_rate_schema};
use std::sync::Mutex;
use tempfile::TempDir;

/// Rejects the rows at the given 1-based positions and records every call.
struct RejectPositions {
    reject: Vec<usize>,
    calls: Mutex<Vec<PreparedRecord>>,
}

impl RejectPositions {
    fn new(reject: &[usize]) -> Self {
        Self {
            reject: reject.to_vec(),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl RecordProcessor for RejectPositions {
    async fn process(&self, record: &PreparedRecord) -> Outcome {
        self.calls.lock().unwrap().push(record.clone());
        if self.reject.contains(&record.position) {
            Outcome::Failure(format!("row {} rejected", record.position))
        } else {
            Outcome::Success
        }
    }
}

fn cede_header() -> Vec<&'static str> {
    CEDE_INTERFACE_COLUMNS.iter().map(|c| c.name).collect()
}

#[tokio::test]
async fn test_rejected_rows_are_exactly_the_failing_ones() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("rates.csv");
    let rows: Vec<String> = (1..=6)
        .map(|day| format!("EUR,USD,1.0{},2025-12-0{}", day, day))
        .collect();
    std::fs::write(&path, rows.join("\n") + "\n")?;

    let schema = exchange_rate_schema();
    let processor = RejectPositions::new(&[2, 5]);
    let result = Reconciler::new(&schema, &processor)
        .reconcile_file(&path)
        .await?;

    assert_eq!(result.total(), 6);
    assert_eq!(result.remote_calls, 6);
    let ok: Vec<usize> = result.ok.iter().map(|r| r.position).collect();
    let errors: Vec<usize> = result.errors.iter().map(|e| e.record.position).collect();
    assert_eq!(ok, vec![1, 3, 4, 6]);
    assert_eq!(errors, vec![2, 5]);
    assert_eq!(result.errors[0].reason, "row 2 rejected");
    assert_eq!(result.ok[0].fields, vec!["EUR", "USD", "1.01", "2025-12-01"]);
    Ok(())
}

#[tokio::test]
async fn test_structural_errors_keep_their_place_in_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("rates.csv");
    std::fs::write(
        &path,
        "EUR,USD,1.08,2025-12-04\nEUR,USD,1.08,2025-12-04,extra\nEUR,USD,,2025-12-04\nGBP,USD,1.27,2025-12-04\n",
    )?;

    let schema = exchange_rate_schema();
    let processor = RejectPositions::new(&[]);
    let result = Reconciler::new(&schema, &processor)
        .reconcile_file(&path)
        .await?;

    assert_eq!(result.total(), 4);
    assert_eq!(processor.call_count(), 2);
    assert_eq!(result.errors[0].record.position, 2);
    assert_eq!(result.errors[0].reason, INVALID_FORMAT);
    assert_eq!(result.errors[1].record.position, 3);
    assert_eq!(result.errors[1].reason, "missing value for RATE");
    Ok(())
}

#[tokio::test]
async fn test_missing_header_columns_fail_the_whole_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("cede.csv");
    let header: Vec<&str> = cede_header()
        .into_iter()
        .filter(|name| *name != "PID" && *name != "STATUS")
        .collect();
    let row = vec![""; header.len()].join(";");
    std::fs::write(&path, format!("{}\n{}\n{}\n", header.join(";"), row, row))?;

    let schema = cede_interface_schema();
    let processor = RejectPositions::new(&[]);
    let result = Reconciler::new(&schema, &processor)
        .reconcile_file(&path)
        .await?;

    assert!(result.ok.is_empty());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].reason,
        "CSV file is missing required columns: PID, STATUS"
    );
    assert_eq!(result.errors[0].record.fields.len(), header.len());
    assert_eq!(result.remote_calls, 0);
    assert_eq!(processor.call_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_header_columns_are_submitted_in_insert_order() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("cede.csv");

    // reversed header plus one column the table does not have
    let mut header = cede_header();
    header.reverse();
    header.push("NOTE");
    let row: Vec<&str> = header
        .iter()
        .map(|name| match *name {
            "PID" => "P-1",
            "RECORD_TYPE" => "7",
            "AS_AT" => "2025-12-31",
            "NOTE" => "ignored",
            _ => "",
        })
        .collect();
    std::fs::write(&path, format!("{}\n{}\n", header.join(";"), row.join(";")))?;

    let schema = cede_interface_schema();
    let processor = RejectPositions::new(&[]);
    let result = Reconciler::new(&schema, &processor)
        .reconcile_file(&path)
        .await?;

    assert_eq!(result.ok.len(), 1);
    assert_eq!(result.header.as_ref().map(Vec::len), Some(header.len()));

    let calls = processor.calls.lock().unwrap();
    let values = &calls[0].values;
    assert_eq!(values.len(), CEDE_INTERFACE_COLUMNS.len());
    let value_of = |name: &str| {
        let index = CEDE_INTERFACE_COLUMNS
            .iter()
            .position(|c| c.name == name)
            .unwrap();
        values[index].clone()
    };
    assert_eq!(value_of("PID").as_deref(), Some("P-1"));
    assert_eq!(value_of("RECORD_TYPE").as_deref(), Some("7"));
    assert_eq!(value_of("AS_AT").as_deref(), Some("2025-12-31"));
    assert_eq!(value_of("STATUS"), None);
    Ok(())
}

#[tokio::test]
async fn test_invalid_typed_value_is_rejected_without_a_call() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("cede.csv");
    let header = cede_header();
    let row: Vec<&str> = header
        .iter()
        .map(|name| if *name == "UW_YEAR" { "20x5" } else { "" })
        .collect();
    std::fs::write(&path, format!("{}\n{}\n", header.join(";"), row.join(";")))?;

    let schema = cede_interface_schema();
    let processor = RejectPositions::new(&[]);
    let result = Reconciler::new(&schema, &processor)
        .reconcile_file(&path)
        .await?;

    assert_eq!(processor.call_count(), 0);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(
        result.errors[0].reason,
        "UW_YEAR: '20x5' is not a valid integer"
    );
    Ok(())
}

#[tokio::test]
async fn test_windows_1252_file_keeps_row_count() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("rates.csv");
    let text = "Zürich Franken,Genève Franc,1.05,2025-12-01\n\
                Münchner Mark,Besançon Livre,0.98,2025-12-02\n\
                Düsseldorf Taler,Orléans Écu,1.11,2025-12-03\n";
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(text);
    assert!(std::str::from_utf8(&bytes).is_err());
    std::fs::write(&path, &bytes)?;

    let schema = exchange_rate_schema();
    let processor = RejectPositions::new(&[]);
    let result = Reconciler::new(&schema, &processor)
        .reconcile_file(&path)
        .await?;

    assert_eq!(result.total(), 3);
    assert_eq!(result.ok.len(), 3);
    assert!(result.ok[0].fields[0].contains('ü'));
    Ok(())
}

#[tokio::test]
async fn test_empty_files_reconcile_to_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;

    let rates = temp_dir.path().join("rates.csv");
    std::fs::write(&rates, "")?;
    let schema = exchange_rate_schema();
    let processor = RejectPositions::new(&[]);
    let result = Reconciler::new(&schema, &processor)
        .reconcile_file(&rates)
        .await?;
    assert_eq!(result.total(), 0);

    let cede = temp_dir.path().join("cede.csv");
    std::fs::write(&cede, format!("{}\n", cede_header().join(";")))?;
    let schema = cede_interface_schema();
    let result = Reconciler::new(&schema, &processor)
        .reconcile_file(&cede)
        .await?;
    assert_eq!(result.total(), 0);
    assert_eq!(processor.call_count(), 0);
    Ok(())
}
