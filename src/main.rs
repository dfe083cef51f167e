//! Professional Reference Data - organisation administration tool
//!
//! Runs database migrations and inspects or deletes organisations from the
//! command line. Results are printed as JSON on stdout; logs go to stderr
//! and/or the configured log directory.

use std::env;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use professional_refdata::config::{LogFormat, LogTarget, LoggingConfig};
use professional_refdata::{db, models::OrganisationStatus, AppConfig, AppError, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "--help" || arg == "-h") || args.is_empty() {
        print_help();
        return Ok(());
    }

    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        println!("Professional Reference Data {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Load configuration first (before logging, so we know log format)
    let config = AppConfig::load().context("Failed to load configuration")?;

    // The guard must be kept alive so buffered log lines reach the file
    let _log_guard = init_logging(&config.logging);

    ensure_data_directory(&config)?;

    info!("Initializing database connection");
    let pool = db::init_pool(&config.database)
        .await
        .context("Failed to initialize database")?;

    let command = args[0].as_str();
    if command == "migrate" {
        info!("Database migrations applied");
        println!("Migrations applied to {}", config.database.url);
        return Ok(());
    }

    let state = AppState::new(config, pool).context("Failed to initialize services")?;
    let service = &state.organisations;

    match (command, &args[1..]) {
        ("list", []) => print_json(&service.retrieve_all_organisations().await?),
        ("list", [status]) => {
            let status = status
                .parse::<OrganisationStatus>()
                .map_err(AppError::invalid_request)?;
            print_json(&service.find_by_organisation_status(status).await?)
        }
        ("show", [identifier]) => print_json(&service.retrieve_organisation(identifier).await?),
        ("delete", [identifier, admin_user_id]) => {
            let organisation = service
                .get_organisation_by_identifier(identifier)
                .await?
                .ok_or_else(|| {
                    AppError::empty_result(format!("Organisation {} not found", identifier))
                })?;
            print_json(&service.delete_organisation(&organisation, admin_user_id).await?)
        }
        _ => {
            print_help();
            bail!("Unknown command or wrong number of arguments: {}", args.join(" "))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Initialize the logging/tracing infrastructure
fn init_logging(log_config: &LoggingConfig) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::{prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_config.level));

    let to_console = matches!(log_config.target, LogTarget::Console | LogTarget::Both);
    let (file_writer, guard) = match log_config.target {
        LogTarget::Console => (None, None),
        LogTarget::File | LogTarget::Both => {
            let (writer, guard) = create_file_writer(log_config);
            (Some(writer), Some(guard))
        }
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(to_console.then(|| format_layer(&log_config.format, std::io::stderr)))
        .with(file_writer.map(|writer| format_layer(&log_config.format, writer)))
        .init();

    guard
}

/// Build a formatting layer for the configured format and writer
fn format_layer<S, W>(
    format: &LogFormat,
    writer: W,
) -> Box<dyn tracing_subscriber::Layer<S> + Send + Sync + 'static>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::{fmt, Layer};

    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(writer)
            .boxed(),
    }
}

/// Create a file writer with optional daily rotation
fn create_file_writer(
    log_config: &LoggingConfig,
) -> (
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
) {
    if let Err(e) = std::fs::create_dir_all(&log_config.log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_config.log_dir, e
        );
    }

    let file_appender = if log_config.daily_rotation {
        tracing_appender::rolling::daily(&log_config.log_dir, &log_config.log_prefix)
    } else {
        tracing_appender::rolling::never(&log_config.log_dir, &log_config.log_prefix)
    };

    tracing_appender::non_blocking(file_appender)
}

/// Ensure the directory of a file-backed SQLite database exists
fn ensure_data_directory(config: &AppConfig) -> Result<()> {
    if let Some(path) = config.database.url.strip_prefix("sqlite://") {
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).context("Failed to create data directory")?;
                info!("Created data directory: {:?}", parent);
            }
        }
    }
    Ok(())
}

/// Print help message
fn print_help() {
    println!(
        r#"Professional Reference Data {}

USAGE:
    professional-refdata [OPTIONS] <COMMAND>

COMMANDS:
    migrate                         Apply database migrations and exit
    list [STATUS]                   List organisations, optionally only those
                                    in STATUS (PENDING or ACTIVE)
    show IDENTIFIER                 Show one organisation in full
    delete IDENTIFIER ADMIN_ID      Delete an organisation on behalf of ADMIN_ID

OPTIONS:
    -h, --help                      Print this help message
    -V, --version                   Print version information

ENVIRONMENT:
    PRD_CONFIG                      Path to configuration file
    DATABASE_URL                    Database connection URL
    USER_PROFILE_URL                Base URL of the user profile service
    USER_PROFILE_TIMEOUT_SECS       User profile request timeout
    RUST_LOG                        Log level (trace, debug, info, warn, error)
    PRD_LOG_FORMAT                  Log format (pretty, json, compact)
    PRD_LOG_TARGET                  Log target (console, file, both)
    PRD_LOG_DIR                     Directory for log files
"#,
        env!("CARGO_PKG_VERSION")
    );
}
