//! Configuration loading and validation

use anyhow::{Context, Result};
use camscout_core::VendorPrefixSet;
use camscout_discovery::arp::DEFAULT_READ_TIMEOUT_MS;
use camscout_discovery::scanner::DEFAULT_MAX_CONCURRENT_PROBES;
use camscout_discovery::ScannerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub control: ControlConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Address-table utility to run
    #[serde(default = "default_arp_program")]
    pub arp_program: String,
    /// Arguments for the address-table utility
    #[serde(default = "default_arp_args")]
    pub arp_args: Vec<String>,
    /// Time allowed for the utility to finish
    #[serde(default = "default_read_timeout")]
    pub read_timeout_ms: u64,
    /// Hardware-address prefixes of camera vendors
    #[serde(default)]
    pub vendor_prefixes: VendorPrefixSet,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            arp_program: default_arp_program(),
            arp_args: default_arp_args(),
            read_timeout_ms: default_read_timeout(),
            vendor_prefixes: VendorPrefixSet::default(),
        }
    }
}

fn default_arp_program() -> String {
    "arp".to_string()
}

fn default_arp_args() -> Vec<String> {
    vec!["-a".to_string()]
}

fn default_read_timeout() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Camera HTTP port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Status endpoint used for liveness
    #[serde(default = "default_status_path")]
    pub status_path: String,
    /// Per-probe timeout
    #[serde(default = "default_probe_timeout")]
    pub timeout_ms: u64,
    /// Probes in flight at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            status_path: default_status_path(),
            timeout_ms: default_probe_timeout(),
            max_concurrent: default_max_concurrent(),
        }
    }
}

fn default_port() -> u16 {
    camscout_control::CAMERA_PORT
}

fn default_status_path() -> String {
    camscout_discovery::probe::STATUS_PATH.to_string()
}

fn default_probe_timeout() -> u64 {
    camscout_discovery::probe::PROBE_TIMEOUT_MS
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_PROBES
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Timeout for shutter and info requests
    #[serde(default = "default_command_timeout")]
    pub command_timeout_ms: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            command_timeout_ms: default_command_timeout(),
        }
    }
}

fn default_command_timeout() -> u64 {
    camscout_control::COMMAND_TIMEOUT_MS
}

impl Config {
    /// Convert to ScannerConfig
    pub fn to_scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            vendor_prefixes: self.discovery.vendor_prefixes.clone(),
            probe_port: self.probe.port,
            status_path: self.probe.status_path.clone(),
            probe_timeout_ms: self.probe.timeout_ms,
            max_concurrent_probes: self.probe.max_concurrent,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

/// Save default configuration to file
pub fn save_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default())?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
