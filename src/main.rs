//! Producer Device Info CLI
//!
//! Resolves a device descriptor from defaults, the client log level
//! override, an optional configuration file and an optional bitrate based
//! storage estimate, then prints it.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use producer_device_info::device::config_file::ConfigFileLoader;
use producer_device_info::{
    release, DeviceInfo, DeviceInfoFactory, Result, DEBUG_LOG_LEVEL_ENV_VAR,
};

// =============================================================================
// CLI Arguments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

/// Producer Device Info - resolve and validate a producer device descriptor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file overriding storage type and size
    #[arg(long, env = "DEVICE_CONFIG_FILE")]
    config_file: Option<PathBuf>,

    /// Average bitrate per stream in bits per second
    #[arg(long, requires = "buffer_duration_secs")]
    bitrate: Option<u64>,

    /// Buffer duration in seconds used with --bitrate
    #[arg(long, requires = "bitrate")]
    buffer_duration_secs: Option<f64>,

    /// Device name
    #[arg(long)]
    name: Option<String>,

    /// Client id
    #[arg(long)]
    client_id: Option<String>,

    /// Number of concurrent streams
    #[arg(long)]
    stream_count: Option<u32>,

    /// Numeric client log level (1 = verbose .. 7 = silent)
    #[arg(long, env = DEBUG_LOG_LEVEL_ENV_VAR)]
    client_log_level: Option<String>,

    /// Skip descriptor validation before printing
    #[arg(long)]
    no_validate: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

// =============================================================================
// Main
// =============================================================================

fn main() {
    let args = Args::parse();

    init_logging(&args);

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut slot = Some(resolve(args)?);

    if let Some(info) = &slot {
        println!("{}", render(info, args.output)?);
    }

    release(Some(&mut slot))
}

fn resolve(args: &Args) -> Result<DeviceInfo> {
    let mut factory =
        DeviceInfoFactory::new().with_log_level_override(args.client_log_level.clone());
    if let Some(name) = &args.name {
        factory = factory.with_name(name.clone());
    }
    if let Some(client_id) = &args.client_id {
        factory = factory.with_client_id(client_id.clone());
    }
    if let Some(stream_count) = args.stream_count {
        factory = factory.with_stream_count(stream_count);
    }

    let mut info = factory.create_default()?;

    if let (Some(bitrate), Some(secs)) = (args.bitrate, args.buffer_duration_secs) {
        let duration = Duration::try_from_secs_f64(secs).map_err(|e| {
            producer_device_info::Error::InvalidArg(format!("buffer duration {}: {}", secs, e))
        })?;
        info.set_storage_size_from_bitrate(bitrate, duration)?;
        info!(
            "Storage sized from bitrate: {} bytes",
            info.storage_info.storage_size
        );
    }

    if let Some(path) = &args.config_file {
        ConfigFileLoader::new()
            .with_size_validation(!args.no_validate)
            .apply(&mut info, path)?;
        info!("Applied configuration file {}", path.display());
    }

    if !args.no_validate {
        info.validate()?;
    }

    Ok(info)
}

fn render(info: &DeviceInfo, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(info)?,
        OutputFormat::Yaml => serde_yaml::to_string(info)?,
    })
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    // Logs go to stderr so stdout carries only the rendered descriptor
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
