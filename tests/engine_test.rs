use anyhow::Result;
use async_trait::async_trait;
use recon_etl::config::pipeline::{
    LocalDirs, LogConfig, PipelineConfig, PipelineKind, StorageConfig,
};
use recon_etl::domain::cede_columns::CEDE_INTERFACE_COLUMNS;
use recon_etl::domain::model::{ItemStatus, Outcome, PreparedRecord, Stage};
use recon_etl::domain::ports::{ObjectStore, RecordProcessor};
use recon_etl::domain::schema::{cede_interface_schema, exchange_rate_schema};
use recon_etl::utils::error::EtlError;
use recon_etl::{EtlEngine, LocalObjectStore};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Rejects exchange-rate rows whose source currency is `XXX`.
struct CurrencyCheck;

#[async_trait]
impl RecordProcessor for CurrencyCheck {
    async fn process(&self, record: &PreparedRecord) -> Outcome {
        match record.values.first() {
            Some(Some(currency)) if currency == "XXX" => {
                Outcome::Failure("Currency XXX does not exist".to_string())
            }
            _ => Outcome::Success,
        }
    }
}

struct Unreachable;

#[async_trait]
impl RecordProcessor for Unreachable {
    async fn ready(&self) -> recon_etl::Result<()> {
        Err(EtlError::DatabaseError {
            message: "connection refused".to_string(),
        })
    }

    async fn process(&self, _record: &PreparedRecord) -> Outcome {
        panic!("no row may be submitted when the endpoint is not ready");
    }
}

/// Local store that fails selected operations.
struct FlakyStore {
    inner: LocalObjectStore,
    fail_list: bool,
    fail_download_key: Option<&'static str>,
    fail_upload_prefix: Option<&'static str>,
    fail_delete: bool,
    // removed right before the remote delete, so the local cleanup finds nothing
    remove_staged_copy: Option<PathBuf>,
}

impl FlakyStore {
    fn new(root: &Path) -> Self {
        Self {
            inner: LocalObjectStore::new(root),
            fail_list: false,
            fail_download_key: None,
            fail_upload_prefix: None,
            fail_delete: false,
            remove_staged_copy: None,
        }
    }
}

impl ObjectStore for FlakyStore {
    async fn list(&self, prefix: &str) -> recon_etl::Result<Vec<String>> {
        if self.fail_list {
            return Err(EtlError::storage("list", prefix, "access denied"));
        }
        self.inner.list(prefix).await
    }

    async fn download(&self, key: &str, local_path: &Path) -> recon_etl::Result<()> {
        if self.fail_download_key == Some(key) {
            return Err(EtlError::storage("download", key, "connection reset"));
        }
        self.inner.download(key, local_path).await
    }

    async fn upload(&self, local_path: &Path, key: &str) -> recon_etl::Result<()> {
        if self.fail_upload_prefix.is_some_and(|prefix| key.starts_with(prefix)) {
            return Err(EtlError::storage("upload", key, "slow down"));
        }
        self.inner.upload(local_path, key).await
    }

    async fn delete(&self, key: &str) -> recon_etl::Result<()> {
        if self.fail_delete {
            return Err(EtlError::storage("delete", key, "access denied"));
        }
        if let Some(path) = &self.remove_staged_copy {
            std::fs::remove_file(path)?;
        }
        self.inner.delete(key).await
    }
}

struct Fixture {
    _temp_dir: TempDir,
    bucket: PathBuf,
    config: PipelineConfig,
}

impl Fixture {
    fn new(kind: PipelineKind) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let bucket = temp_dir.path().join("bucket");
        let work = temp_dir.path().join("work");
        std::fs::create_dir_all(bucket.join("in/pending"))?;

        let config = PipelineConfig {
            kind,
            storage: StorageConfig {
                region: "eu-west-1".to_string(),
                access_key_id: "test".to_string(),
                secret_access_key: "test".to_string(),
                bucket: "test-bucket".to_string(),
                endpoint_url: None,
                pending_folder: "in/pending/".to_string(),
                processed_folder: "in/processed/".to_string(),
                error_folder: "in/error/".to_string(),
            },
            local: LocalDirs {
                pending_dir: work.join("pending"),
                processed_dir: work.join("processed"),
                error_dir: work.join("error"),
            },
            log: LogConfig {
                log_dir: work.join("log"),
                log_filename: "test.log".to_string(),
                level: "info".to_string(),
                json: false,
            },
        };
        Ok(Self {
            _temp_dir: temp_dir,
            bucket,
            config,
        })
    }

    fn put_pending(&self, name: &str, content: &str) -> Result<()> {
        let path = self.bucket.join("in/pending").join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    fn remote(&self, key: &str) -> PathBuf {
        self.bucket.join(key)
    }

    fn read_remote(&self, key: &str) -> Result<String> {
        Ok(std::fs::read_to_string(self.remote(key))?)
    }
}

#[tokio::test]
async fn test_batch_publishes_outputs_and_cleans_up() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::ExchangeRates)?;
    fixture.put_pending(
        "rates_20251204.csv",
        "EUR,USD,1.08,2025-12-04\nXXX,USD,1.2,2025-12-04\nEUR,GBP,0.86,2025-12-04\n",
    )?;
    fixture.put_pending("empty.csv", "")?;

    let store = LocalObjectStore::new(&fixture.bucket);
    let schema = exchange_rate_schema();
    let engine = EtlEngine::new(&store, &CurrencyCheck, &schema, &fixture.config);
    let report = engine.run("test-run").await?;

    assert_eq!(report.run_id, "test-run");
    assert_eq!(report.completed(), 2);
    assert_eq!(report.failed(), 0);

    let rates = report
        .items
        .iter()
        .find(|item| item.filename == "rates_20251204.csv")
        .unwrap();
    assert_eq!(rates.status, ItemStatus::Completed { ok: 2, errors: 1 });

    assert_eq!(
        fixture.read_remote("in/processed/rates_20251204_ok.csv")?,
        "EUR,USD,1.08,2025-12-04\nEUR,GBP,0.86,2025-12-04\n"
    );
    assert_eq!(
        fixture.read_remote("in/error/rates_20251204_error.csv")?,
        "XXX,USD,1.2,2025-12-04,Currency XXX does not exist\n"
    );

    // empty results are still produced and uploaded
    assert_eq!(fixture.read_remote("in/processed/empty_ok.csv")?, "");
    assert_eq!(fixture.read_remote("in/error/empty_error.csv")?, "");

    assert!(store.list("in/pending/").await?.is_empty());
    assert!(!fixture
        .config
        .local
        .pending_dir
        .join("rates_20251204.csv")
        .exists());
    Ok(())
}

#[tokio::test]
async fn test_failed_upload_keeps_remote_and_local_sources() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::ExchangeRates)?;
    fixture.put_pending("rates.csv", "EUR,USD,1.08,2025-12-04\n")?;

    let mut store = FlakyStore::new(&fixture.bucket);
    store.fail_upload_prefix = Some("in/error/");
    let schema = exchange_rate_schema();
    let engine = EtlEngine::new(&store, &CurrencyCheck, &schema, &fixture.config);
    let report = engine.run("test-run").await?;

    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.items[0].status,
        ItemStatus::Failed {
            stage: Stage::Upload,
            ..
        }
    ));
    assert!(fixture.remote("in/pending/rates.csv").exists());
    assert!(fixture
        .config
        .local
        .pending_dir
        .join("rates.csv")
        .exists());
    assert!(!fixture.remote("in/error/rates_error.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_download_failure_skips_only_that_item() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::ExchangeRates)?;
    fixture.put_pending("a.csv", "EUR,USD,1.08,2025-12-04\n")?;
    fixture.put_pending("b.csv", "EUR,GBP,0.86,2025-12-04\n")?;

    let mut store = FlakyStore::new(&fixture.bucket);
    store.fail_download_key = Some("in/pending/a.csv");
    let schema = exchange_rate_schema();
    let engine = EtlEngine::new(&store, &CurrencyCheck, &schema, &fixture.config);
    let report = engine.run("test-run").await?;

    assert_eq!(report.completed(), 1);
    assert_eq!(report.failed(), 1);
    let failed = report
        .items
        .iter()
        .find(|item| item.filename == "a.csv")
        .unwrap();
    assert!(matches!(
        failed.status,
        ItemStatus::Failed {
            stage: Stage::Download,
            ..
        }
    ));
    assert!(fixture.remote("in/pending/a.csv").exists());
    assert!(!fixture.remote("in/pending/b.csv").exists());
    assert!(fixture.remote("in/processed/b_ok.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_listing_failure_aborts_the_run() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::ExchangeRates)?;
    fixture.put_pending("a.csv", "EUR,USD,1.08,2025-12-04\n")?;

    let mut store = FlakyStore::new(&fixture.bucket);
    store.fail_list = true;
    let schema = exchange_rate_schema();
    let engine = EtlEngine::new(&store, &CurrencyCheck, &schema, &fixture.config);

    let err = engine.run("test-run").await.unwrap_err();
    assert!(matches!(err, EtlError::StorageError { .. }));
    assert!(fixture.remote("in/pending/a.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_unready_endpoint_leaves_item_pending() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::Cede)?;
    let header: Vec<&str> = CEDE_INTERFACE_COLUMNS.iter().map(|c| c.name).collect();
    fixture.put_pending("cede.csv", &format!("{}\n", header.join(";")))?;

    let store = LocalObjectStore::new(&fixture.bucket);
    let schema = cede_interface_schema();
    let engine = EtlEngine::new(&store, &Unreachable, &schema, &fixture.config);
    let report = engine.run("test-run").await?;

    assert!(matches!(
        report.items[0].status,
        ItemStatus::Failed {
            stage: Stage::Reconcile,
            ..
        }
    ));
    assert!(fixture.remote("in/pending/cede.csv").exists());
    assert!(!fixture.remote("in/processed/cede_ok.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_columns_item_is_published_as_one_error() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::Cede)?;
    fixture.put_pending("cede.csv", "PID;STATUS\nP-1;NEW\n")?;

    let store = LocalObjectStore::new(&fixture.bucket);
    let schema = cede_interface_schema();
    let engine = EtlEngine::new(&store, &CurrencyCheck, &schema, &fixture.config);
    let report = engine.run("test-run").await?;

    assert_eq!(report.items[0].status, ItemStatus::Completed { ok: 0, errors: 1 });
    assert_eq!(fixture.read_remote("in/processed/cede_ok.csv")?, "PID;STATUS\n");
    let error_file = fixture.read_remote("in/error/cede_error.csv")?;
    let mut lines = error_file.lines();
    assert_eq!(lines.next(), Some("PID;STATUS;ERROR"));
    let reason = lines.next().unwrap();
    assert!(reason.starts_with(";;CSV file is missing required columns: "));
    assert!(reason.contains("IMPORT_TS"));
    assert!(!fixture.remote("in/pending/cede.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_report_serializes_with_status_tag() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::ExchangeRates)?;
    fixture.put_pending("a.csv", "EUR,USD,1.08,2025-12-04\n")?;

    let store = LocalObjectStore::new(&fixture.bucket);
    let schema = exchange_rate_schema();
    let engine = EtlEngine::new(&store, &CurrencyCheck, &schema, &fixture.config);
    let report = engine.run("test-run").await?;

    let json = serde_json::to_value(&report)?;
    assert_eq!(json["run_id"], "test-run");
    assert_eq!(json["items"][0]["key"], "in/pending/a.csv");
    assert_eq!(json["items"][0]["status"], "completed");
    assert_eq!(json["items"][0]["ok"], 1);
    Ok(())
}

#[tokio::test]
async fn test_failed_remote_delete_keeps_local_source() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::ExchangeRates)?;
    fixture.put_pending("rates.csv", "EUR,USD,1.08,2025-12-04\n")?;

    let mut store = FlakyStore::new(&fixture.bucket);
    store.fail_delete = true;
    let schema = exchange_rate_schema();
    let engine = EtlEngine::new(&store, &CurrencyCheck, &schema, &fixture.config);
    let report = engine.run("test-run").await?;

    assert_eq!(report.failed(), 1);
    assert!(matches!(
        report.items[0].status,
        ItemStatus::Failed {
            stage: Stage::Cleanup,
            ..
        }
    ));
    // outputs were published before the delete was attempted
    assert!(fixture.remote("in/processed/rates_ok.csv").exists());
    assert!(fixture.remote("in/error/rates_error.csv").exists());
    assert!(fixture.remote("in/pending/rates.csv").exists());
    assert!(fixture
        .config
        .local
        .pending_dir
        .join("rates.csv")
        .exists());
    Ok(())
}

#[tokio::test]
async fn test_failed_local_delete_still_completes() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::ExchangeRates)?;
    fixture.put_pending("rates.csv", "EUR,USD,1.08,2025-12-04\n")?;

    let mut store = FlakyStore::new(&fixture.bucket);
    store.remove_staged_copy = Some(fixture.config.local.pending_dir.join("rates.csv"));
    let schema = exchange_rate_schema();
    let engine = EtlEngine::new(&store, &CurrencyCheck, &schema, &fixture.config);
    let report = engine.run("test-run").await?;

    assert_eq!(report.items[0].status, ItemStatus::Completed { ok: 1, errors: 0 });
    assert_eq!(report.failed(), 0);
    assert!(!fixture.remote("in/pending/rates.csv").exists());
    assert!(fixture.remote("in/processed/rates_ok.csv").exists());
    Ok(())
}

#[tokio::test]
async fn test_same_filename_in_two_folders_runs_only_the_first() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::ExchangeRates)?;
    fixture.put_pending("a/x.csv", "EUR,USD,1.08,2025-12-04\n")?;
    fixture.put_pending("b/x.csv", "EUR,GBP,0.86,2025-12-04\n")?;

    let store = LocalObjectStore::new(&fixture.bucket);
    let schema = exchange_rate_schema();
    let engine = EtlEngine::new(&store, &CurrencyCheck, &schema, &fixture.config);
    let report = engine.run("test-run").await?;

    assert_eq!(report.completed(), 1);
    assert_eq!(report.failed(), 1);
    let second = report
        .items
        .iter()
        .find(|item| item.key == "in/pending/b/x.csv")
        .unwrap();
    assert!(matches!(
        second.status,
        ItemStatus::Failed {
            stage: Stage::Discover,
            ..
        }
    ));

    assert_eq!(
        fixture.read_remote("in/processed/x_ok.csv")?,
        "EUR,USD,1.08,2025-12-04\n"
    );
    assert!(!fixture.remote("in/pending/a/x.csv").exists());
    assert_eq!(
        fixture.read_remote("in/pending/b/x.csv")?,
        "EUR,GBP,0.86,2025-12-04\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_same_stem_with_other_extension_stays_pending() -> Result<()> {
    let fixture = Fixture::new(PipelineKind::ExchangeRates)?;
    fixture.put_pending("rates.csv", "EUR,USD,1.08,2025-12-04\n")?;
    fixture.put_pending("rates.txt", "XXX,USD,1.2,2025-12-04\n")?;

    let store = LocalObjectStore::new(&fixture.bucket);
    let schema = exchange_rate_schema();
    let engine = EtlEngine::new(&store, &CurrencyCheck, &schema, &fixture.config);
    let report = engine.run("test-run").await?;

    let txt = report
        .items
        .iter()
        .find(|item| item.filename == "rates.txt")
        .unwrap();
    match &txt.status {
        ItemStatus::Failed { stage, message } => {
            assert_eq!(*stage, Stage::Discover);
            assert!(message.contains("in/pending/rates.csv"), "{}", message);
        }
        other => panic!("unexpected status: {:?}", other),
    }

    assert_eq!(
        fixture.read_remote("in/processed/rates_ok.csv")?,
        "EUR,USD,1.08,2025-12-04\n"
    );
    assert_eq!(fixture.read_remote("in/error/rates_error.csv")?, "");
    assert!(!fixture.remote("in/pending/rates.csv").exists());
    assert!(fixture.remote("in/pending/rates.txt").exists());

    // the next run picks it up once the name is free
    let report = engine.run("next-run").await?;
    assert_eq!(report.items[0].status, ItemStatus::Completed { ok: 0, errors: 1 });
    assert!(!fixture.remote("in/pending/rates.txt").exists());
    Ok(())
}
