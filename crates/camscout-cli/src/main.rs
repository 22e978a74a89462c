//! camscout - Main entry point
//!
//! Discovers cameras in the host address table and sends shutter commands.

mod config;

use anyhow::{bail, Result};
use camscout_control::{CameraClient, Shutter};
use camscout_core::ConfirmedDevice;
use camscout_discovery::{ArpCommand, DiscoveryScanner, HttpTransport};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "camscout")]
#[command(about = "Find cameras on the local network and control the shutter")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "camscout.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Override the liveness probe timeout in milliseconds
    #[arg(short, long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List cameras without sending any command
    Scan {
        /// Query each camera for its model name
        #[arg(long)]
        info: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start or stop recording on a discovered camera
    Shutter {
        action: ShutterAction,
        /// Index of the camera in the discovery list
        #[arg(short, long, default_value_t = 0)]
        device: usize,
    },
    /// Write a configuration file with default values
    InitConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ShutterAction {
    Start,
    Stop,
}

impl From<ShutterAction> for Shutter {
    fn from(action: ShutterAction) -> Self {
        match action {
            ShutterAction::Start => Shutter::Start,
            ShutterAction::Stop => Shutter::Stop,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("camscout v{}", env!("CARGO_PKG_VERSION"));

    match args.command {
        Some(Command::InitConfig) => {
            config::save_default_config(&args.config)?;
            println!("Wrote default configuration to {}", args.config.display());
        }
        Some(Command::Scan { info, json }) => {
            let session = Session::open(&args.config, args.timeout_ms)?;
            let devices = session.scanner.discover().await;
            print_scan(&session.client, &devices, info, json).await?;
        }
        Some(Command::Shutter { action, device }) => {
            let session = Session::open(&args.config, args.timeout_ms)?;
            let devices = session.scanner.discover().await;
            if devices.is_empty() {
                println!("No GoPros found on network.");
                return Ok(());
            }
            let Some(target) = devices.get(device) else {
                bail!(
                    "Device index {} out of range ({} found)",
                    device,
                    devices.len()
                );
            };
            send_shutter(&session.client, target, action.into()).await;
        }
        None => {
            let session = Session::open(&args.config, args.timeout_ms)?;
            let devices = session.scanner.discover().await;
            print_devices(&devices);
            if let Some(first) = devices.first() {
                if devices.len() > 1 {
                    warn!(
                        found = devices.len(),
                        target = %first.ip,
                        "Multiple cameras found; using the first (pick another with `shutter --device`)"
                    );
                }
                send_shutter(&session.client, first, Shutter::Start).await;
            }
        }
    }

    Ok(())
}

/// HTTP client and scanner for one run.
///
/// The client is shared by every probe and command and is released when the
/// session is dropped.
struct Session {
    client: CameraClient,
    scanner: DiscoveryScanner,
}

impl Session {
    fn open(config_path: &Path, timeout_ms: Option<u64>) -> Result<Self> {
        let mut config = config::load_config(config_path)?;
        if let Some(timeout_ms) = timeout_ms {
            config.probe.timeout_ms = timeout_ms;
        }

        info!(
            prefixes = config.discovery.vendor_prefixes.len(),
            timeout_ms = config.probe.timeout_ms,
            "Configuration loaded"
        );

        let client = CameraClient::with_settings(
            config.probe.port,
            Duration::from_millis(config.control.command_timeout_ms),
        )?;

        let source = ArpCommand::new(
            config.discovery.arp_program.clone(),
            config.discovery.arp_args.clone(),
            Duration::from_millis(config.discovery.read_timeout_ms),
        );
        let scanner = DiscoveryScanner::new(
            config.to_scanner_config(),
            Arc::new(source),
            Arc::new(HttpTransport::new(client.http().clone())),
        );

        Ok(Self { client, scanner })
    }
}

/// Print the numbered device list
fn print_devices(devices: &[ConfirmedDevice]) {
    if devices.is_empty() {
        println!("No GoPros found on network.");
        return;
    }
    println!("Discovered GoPro(s):");
    for (i, device) in devices.iter().enumerate() {
        println!("[{}] {}", i, device.ip);
    }
}

async fn print_scan(
    client: &CameraClient,
    devices: &[ConfirmedDevice],
    with_info: bool,
    json: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(devices)?);
        return Ok(());
    }
    if !with_info {
        print_devices(devices);
        return Ok(());
    }
    if devices.is_empty() {
        println!("No GoPros found on network.");
        return Ok(());
    }
    println!("Discovered GoPro(s):");
    for (i, device) in devices.iter().enumerate() {
        let model = client.model_label(device.ip).await;
        println!("[{}] {} @ {}", i, model, device.ip);
    }
    Ok(())
}

/// Dispatch a shutter command and report the outcome; failures are not fatal
async fn send_shutter(client: &CameraClient, device: &ConfirmedDevice, shutter: Shutter) {
    match (client.set_shutter(device.ip, shutter).await, shutter) {
        (Ok(()), Shutter::Start) => println!("Started recording on GoPro."),
        (Ok(()), Shutter::Stop) => println!("Stopped recording on GoPro."),
        (Err(_), _) => println!("Failed to {} recording.", shutter),
    }
}
