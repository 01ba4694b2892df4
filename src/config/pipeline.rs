use crate::config::settings::{Settings, SettingsReader};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::*;
use std::path::PathBuf;

/// The two pipelines this tool runs. Each has its own folder defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    ExchangeRates,
    Cede,
}

impl PipelineKind {
    pub fn name(self) -> &'static str {
        match self {
            PipelineKind::ExchangeRates => "exchange_rate",
            PipelineKind::Cede => "cede_interface",
        }
    }

    fn default_s3_root(self) -> &'static str {
        match self {
            PipelineKind::ExchangeRates => "noprod/inbound/exchange_rate",
            PipelineKind::Cede => "prod/inbound/cede_interface",
        }
    }
}

#[derive(Clone)]
pub struct StorageConfig {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub endpoint_url: Option<String>,
    pub pending_folder: String,
    pub processed_folder: String,
    pub error_folder: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("endpoint_url", &self.endpoint_url)
            .field("pending_folder", &self.pending_folder)
            .field("processed_folder", &self.processed_folder)
            .field("error_folder", &self.error_folder)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct LocalDirs {
    pub pending_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub error_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub log_filename: String,
    pub level: String,
    pub json: bool,
}

/// Settings shared by both pipelines.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub kind: PipelineKind,
    pub storage: StorageConfig,
    pub local: LocalDirs,
    pub log: LogConfig,
}

impl PipelineConfig {
    /// Folder prefixes are kept raw here; `normalize_folders` checks them
    /// once every missing setting has been collected.
    fn read(kind: PipelineKind, reader: &mut SettingsReader<'_>) -> Self {
        let s3_root = kind.default_s3_root();
        let local_root = PathBuf::from("data").join(kind.name());
        let local_dir = |name: &str, leaf: &str| {
            reader
                .optional(&[name])
                .map(PathBuf::from)
                .unwrap_or_else(|| local_root.join(leaf))
        };
        let local = LocalDirs {
            pending_dir: local_dir("LOCAL_PENDING_DIR", "pending"),
            processed_dir: local_dir("LOCAL_PROCESSED_DIR", "processed"),
            error_dir: local_dir("LOCAL_ERROR_DIR", "error"),
        };
        let log_dir = local_dir("LOG_DIR", "log");

        let storage = StorageConfig {
            region: reader.required(&["AWS_REGION", "AWS_REGION_NAME"]),
            access_key_id: reader.required(&["AWS_ACCESS_KEY_ID"]),
            secret_access_key: reader.required(&["AWS_SECRET_ACCESS_KEY"]),
            bucket: reader.required(&["S3_BUCKET_NAME", "AWS_S3_BUCKET"]),
            endpoint_url: reader.optional(&["S3_ENDPOINT_URL"]),
            pending_folder: reader
                .or_default(&["S3_PENDING_FOLDER"], &format!("{}/pending/", s3_root)),
            processed_folder: reader
                .or_default(&["S3_PROCESSED_FOLDER"], &format!("{}/processed/", s3_root)),
            error_folder: reader
                .or_default(&["S3_ERROR_FOLDER"], &format!("{}/error/", s3_root)),
        };

        let log = LogConfig {
            log_dir,
            log_filename: reader.or_default(&["LOG_FILENAME"], &format!("{}.log", kind.name())),
            level: reader.or_default(&["LOG_LEVEL"], "info").to_lowercase(),
            json: reader
                .optional(&["LOG_FORMAT"])
                .is_some_and(|format| format.eq_ignore_ascii_case("json")),
        };

        Self {
            kind,
            storage,
            local,
            log,
        }
    }

    fn normalize_folders(&mut self) -> Result<()> {
        let storage = &mut self.storage;
        for (field, folder) in [
            ("S3_PENDING_FOLDER", &mut storage.pending_folder),
            ("S3_PROCESSED_FOLDER", &mut storage.processed_folder),
            ("S3_ERROR_FOLDER", &mut storage.error_folder),
        ] {
            *folder = normalize_folder_prefix(field, folder)?;
        }
        Ok(())
    }
}

impl Validate for PipelineConfig {
    fn validate(&self) -> Result<()> {
        validate_aws_region("AWS_REGION", &self.storage.region)?;
        validate_s3_bucket_name("S3_BUCKET_NAME", &self.storage.bucket)?;
        if let Some(endpoint) = &self.storage.endpoint_url {
            validate_url("S3_ENDPOINT_URL", endpoint)?;
        }
        for (field, path) in [
            ("LOCAL_PENDING_DIR", &self.local.pending_dir),
            ("LOCAL_PROCESSED_DIR", &self.local.processed_dir),
            ("LOCAL_ERROR_DIR", &self.local.error_dir),
            ("LOG_DIR", &self.log.log_dir),
        ] {
            validate_path(field, &path.to_string_lossy())?;
        }
        validate_non_empty_string("LOG_FILENAME", &self.log.log_filename)?;
        match self.log.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(EtlError::InvalidConfigValueError {
                field: "LOG_LEVEL".to_string(),
                value: other.to_string(),
                reason: "Expected one of trace, debug, info, warn, error".to_string(),
            }),
        }
    }
}

#[derive(Clone)]
pub struct SoapConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
    pub namespace: String,
    pub answer_yes: String,
    pub timeout_secs: u64,
}

impl std::fmt::Debug for SoapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoapConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("namespace", &self.namespace)
            .field("answer_yes", &self.answer_yes)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl Validate for SoapConfig {
    fn validate(&self) -> Result<()> {
        validate_url("WSDL_URL", &self.endpoint)?;
        validate_non_empty_string("WS_USERNAME", &self.username)?;
        validate_range("WS_TIMEOUT_SECS", self.timeout_secs, 1, 600)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ExchangeRateConfig {
    pub pipeline: PipelineConfig,
    pub soap: SoapConfig,
}

impl ExchangeRateConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut reader = settings.reader();
        let mut pipeline = PipelineConfig::read(PipelineKind::ExchangeRates, &mut reader);

        let wsdl_url = reader.required(&["WSDL_URL"]);
        let username = reader.required(&["WS_USERNAME"]);
        let password = reader.required(&["WS_PASSWORD"]);
        let namespace = reader.or_default(&["WS_NAMESPACE"], "http://www.sics.com/ws");
        let answer_yes = reader.or_default(&["WS_ANSWER_YES"], "AC0534");
        let timeout_secs = reader.parsed("WS_TIMEOUT_SECS", 60);
        reader.finish()?;
        pipeline.normalize_folders()?;

        let soap = SoapConfig {
            endpoint: wsdl_url
                .strip_suffix("?wsdl")
                .or_else(|| wsdl_url.strip_suffix("?WSDL"))
                .unwrap_or(&wsdl_url)
                .to_string(),
            username,
            password,
            namespace,
            answer_yes,
            timeout_secs: timeout_secs?,
        };

        let config = Self { pipeline, soap };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for ExchangeRateConfig {
    fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        self.soap.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    Postgres,
    MySql,
    Sqlite,
}

impl DatabaseBackend {
    pub fn from_url(url: &str) -> Option<Self> {
        let scheme = url.split(':').next()?.to_ascii_lowercase();
        match scheme.as_str() {
            "postgres" | "postgresql" => Some(DatabaseBackend::Postgres),
            "mysql" | "mariadb" => Some(DatabaseBackend::MySql),
            "sqlite" => Some(DatabaseBackend::Sqlite),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub backend: DatabaseBackend,
}

// The URL carries the password.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

impl DatabaseConfig {
    fn read(reader: &mut SettingsReader<'_>) -> Result<Self> {
        let url = match reader.optional(&["CED_DB_URL"]) {
            Some(url) => url,
            None => {
                let parts = [
                    reader.required(&["CED_DB_DRIVER"]),
                    reader.required(&["CED_DB_SERVER"]),
                    reader.required(&["CED_DB_DATABASE"]),
                    reader.required(&["CED_DB_USERNAME"]),
                    reader.required(&["CED_DB_PASSWORD"]),
                ];
                if parts.iter().any(String::is_empty) {
                    // reported by finish()
                    return Ok(Self {
                        url: String::new(),
                        backend: DatabaseBackend::Sqlite,
                    });
                }
                let [driver, server, database, username, password] = parts;
                build_database_url(&driver, &server, &database, &username, &password)?
            }
        };

        let backend = DatabaseBackend::from_url(&url).ok_or_else(|| {
            EtlError::InvalidConfigValueError {
                field: "CED_DB_URL".to_string(),
                value: url.split(':').next().unwrap_or_default().to_string(),
                reason: "Supported databases are postgres, mysql and sqlite".to_string(),
            }
        })?;
        Ok(Self { url, backend })
    }
}

fn build_database_url(
    driver: &str,
    server: &str,
    database: &str,
    username: &str,
    password: &str,
) -> Result<String> {
    let scheme = driver.trim().to_ascii_lowercase();
    if scheme == "sqlite" {
        return Ok(format!("sqlite://{}", database));
    }

    let mut url = url::Url::parse(&format!("{}://{}/", scheme, server)).map_err(|e| {
        EtlError::InvalidConfigValueError {
            field: "CED_DB_SERVER".to_string(),
            value: server.to_string(),
            reason: format!("Invalid server address: {}", e),
        }
    })?;
    url.set_path(database);
    let credentials_ok = url.set_username(username).is_ok() && url.set_password(Some(password)).is_ok();
    if !credentials_ok {
        return Err(EtlError::InvalidConfigValueError {
            field: "CED_DB_SERVER".to_string(),
            value: server.to_string(),
            reason: "Server address cannot carry credentials".to_string(),
        });
    }
    Ok(url.to_string())
}

#[derive(Debug, Clone)]
pub struct CedeConfig {
    pub pipeline: PipelineConfig,
    pub database: DatabaseConfig,
}

impl CedeConfig {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let mut reader = settings.reader();
        let mut pipeline = PipelineConfig::read(PipelineKind::Cede, &mut reader);
        let database = DatabaseConfig::read(&mut reader);
        reader.finish()?;
        pipeline.normalize_folders()?;
        let database = database?;

        let config = Self { pipeline, database };
        config.validate()?;
        Ok(config)
    }
}

impl Validate for CedeConfig {
    fn validate(&self) -> Result<()> {
        self.pipeline.validate()?;
        validate_non_empty_string("CED_DB_URL", &self.database.url)
    }
}
