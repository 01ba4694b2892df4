use clap::Parser;
use recon_etl::config::pipeline::{CedeConfig, ExchangeRateConfig, PipelineConfig};
use recon_etl::config::settings::Settings;
use recon_etl::config::{CliConfig, Command};
use recon_etl::domain::cede_columns::{CEDE_INTERFACE_COLUMNS, CEDE_INTERFACE_TABLE};
use recon_etl::domain::ports::{ObjectStore, RecordProcessor};
use recon_etl::domain::schema::{cede_interface_schema, exchange_rate_schema, Schema};
use recon_etl::utils::error::ErrorSeverity;
use recon_etl::utils::logger;
use recon_etl::{EtlEngine, EtlError, S3Store, SoapRecordClient, SqlRecordSink};
use tracing::Instrument;

const EXIT_ITEM_FAILED: i32 = 2;
const EXIT_CONFIG: i32 = 1;
const EXIT_SYSTEM: i32 = 3;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = CliConfig::parse();

    // .env 不覆蓋既有環境變數
    let env_loaded = match &cli.env_file {
        Some(path) => dotenvy::from_path(path).map_err(|e| EtlError::ConfigError {
            message: format!("Cannot load {}: {}", path.display(), e),
        }),
        None => {
            dotenvy::dotenv().ok();
            Ok(())
        }
    };

    let settings = match env_loaded.and_then(|_| Settings::load(cli.config.as_deref())) {
        Ok(settings) => settings,
        Err(e) => exit_on_startup_error(&cli, &e),
    };

    let code = match &cli.command {
        Command::ExchangeRates { .. } => run_exchange_rates(&cli, &settings).await,
        Command::Cede { .. } => run_cede(&cli, &settings).await,
    };
    std::process::exit(code);
}

async fn run_exchange_rates(cli: &CliConfig, settings: &Settings) -> i32 {
    let config = match ExchangeRateConfig::from_settings(settings) {
        Ok(config) => config,
        Err(e) => exit_on_startup_error(cli, &e),
    };
    if cli.verbose {
        eprintln!("Configuration: {:?}", config);
    }

    let processor = match SoapRecordClient::new(config.soap.clone()) {
        Ok(processor) => processor,
        Err(e) => exit_on_startup_error(cli, &e),
    };
    let store = S3Store::from_config(&config.pipeline.storage).await;
    run_pipeline(cli, &config.pipeline, &store, &processor, &exchange_rate_schema()).await
}

async fn run_cede(cli: &CliConfig, settings: &Settings) -> i32 {
    let config = match CedeConfig::from_settings(settings) {
        Ok(config) => config,
        Err(e) => exit_on_startup_error(cli, &e),
    };
    if cli.verbose {
        eprintln!("Configuration: {:?}", config);
    }

    let processor =
        match SqlRecordSink::new(&config.database, CEDE_INTERFACE_TABLE, CEDE_INTERFACE_COLUMNS) {
            Ok(processor) => processor,
            Err(e) => exit_on_startup_error(cli, &e),
        };
    let store = S3Store::from_config(&config.pipeline.storage).await;
    run_pipeline(cli, &config.pipeline, &store, &processor, &cede_interface_schema()).await
}

async fn run_pipeline<S: ObjectStore, P: RecordProcessor>(
    cli: &CliConfig,
    config: &PipelineConfig,
    store: &S,
    processor: &P,
    schema: &Schema,
) -> i32 {
    let engine = EtlEngine::new(store, processor, schema, config);

    if cli.command.dry_run() {
        logger::init_cli_logger(cli.verbose);
        return match engine.discover().await {
            Ok(items) => {
                for item in &items {
                    println!("{}", item.key);
                }
                0
            }
            Err(e) => report_run_error(&e),
        };
    }

    if let Err(e) = logger::init_run_logger(&config.log, cli.verbose) {
        logger::init_cli_logger(cli.verbose);
        return report_run_error(&e);
    }

    let run_id = logger::new_run_id(config.kind.name());
    let span = tracing::info_span!("run", run_id = %run_id, pipeline = config.kind.name());

    async {
        tracing::info!("Starting {} pipeline", config.kind.name());
        let report = match engine.run(&run_id).await {
            Ok(report) => report,
            Err(e) => return report_run_error(&e),
        };

        if cli.json {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => return report_run_error(&EtlError::from(e)),
            }
        }

        if report.failed() > 0 {
            tracing::warn!(
                "⚠️ {} item(s) failed and stay pending for the next run",
                report.failed()
            );
            EXIT_ITEM_FAILED
        } else {
            tracing::info!("✅ ETL process completed successfully!");
            0
        }
    }
    .instrument(span)
    .await
}

fn exit_on_startup_error(cli: &CliConfig, e: &EtlError) -> ! {
    logger::init_cli_logger(cli.verbose);
    tracing::error!("❌ Configuration validation failed: {}", e);
    tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    std::process::exit(EXIT_CONFIG);
}

fn report_run_error(e: &EtlError) -> i32 {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    match e.severity() {
        ErrorSeverity::High => EXIT_CONFIG,
        ErrorSeverity::Medium | ErrorSeverity::Critical => EXIT_SYSTEM,
    }
}
