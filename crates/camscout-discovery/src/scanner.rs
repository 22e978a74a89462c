//! Discovery scanner that combines reading, filtering and probing

use camscout_core::{AddressTableEntry, ConfirmedDevice, VendorPrefixSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::arp::{parse_arp_line, AddressTableSource};
use crate::probe::{LivenessProber, ProbeTransport, HTTP_PORT, PROBE_TIMEOUT_MS, STATUS_PATH};
use crate::vendor::is_known_vendor;

/// Default number of probes in flight at once
pub const DEFAULT_MAX_CONCURRENT_PROBES: usize = 16;

/// Scanner configuration
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Hardware-address prefixes that identify camera candidates
    pub vendor_prefixes: VendorPrefixSet,
    /// Port of the status endpoint
    pub probe_port: u16,
    /// Path of the status endpoint
    pub status_path: String,
    /// Per-probe timeout in milliseconds
    pub probe_timeout_ms: u64,
    /// Upper bound on concurrent probes
    pub max_concurrent_probes: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            vendor_prefixes: VendorPrefixSet::default(),
            probe_port: HTTP_PORT,
            status_path: STATUS_PATH.to_string(),
            probe_timeout_ms: PROBE_TIMEOUT_MS,
            max_concurrent_probes: DEFAULT_MAX_CONCURRENT_PROBES,
        }
    }
}

/// Runs one discovery pass per call; holds no state between passes
pub struct DiscoveryScanner {
    config: ScannerConfig,
    source: Arc<dyn AddressTableSource>,
    prober: LivenessProber,
}

impl DiscoveryScanner {
    /// Create a new scanner with the given configuration
    pub fn new(
        config: ScannerConfig,
        source: Arc<dyn AddressTableSource>,
        transport: Arc<dyn ProbeTransport>,
    ) -> Self {
        let prober = LivenessProber::new(transport)
            .with_port(config.probe_port)
            .with_status_path(config.status_path.clone())
            .with_timeout(Duration::from_millis(config.probe_timeout_ms));
        Self {
            config,
            source,
            prober,
        }
    }

    /// Read the address table and keep entries with a known vendor prefix,
    /// tagged with their position in the table
    pub async fn candidates(&self) -> Vec<(usize, AddressTableEntry)> {
        let dump = match self.source.read().await {
            Ok(dump) => dump,
            Err(e) => {
                warn!(error = %e, "Address table unavailable, nothing to discover");
                return Vec::new();
            }
        };

        let mut candidates = Vec::new();
        for (index, line) in dump.into_iter().enumerate() {
            let Some(entry) = parse_arp_line(&line) else {
                continue;
            };
            if is_known_vendor(&entry.hardware_address, &self.config.vendor_prefixes) {
                debug!(ip = %entry.ip, mac = %entry.hardware_address, "Vendor match");
                candidates.push((index, entry));
            }
        }
        candidates
    }

    /// Run a single discovery pass.
    ///
    /// Candidates are probed concurrently; results come back in address-table
    /// order regardless of which probe finished first.
    pub async fn discover(&self) -> Vec<ConfirmedDevice> {
        let candidates = self.candidates().await;
        if candidates.is_empty() {
            info!("No vendor candidates in address table");
            return Vec::new();
        }

        let total = candidates.len();
        debug!("Probing {} candidate hosts", total);

        let permits = self
            .config
            .max_concurrent_probes
            .clamp(1, Semaphore::MAX_PERMITS);
        let limit = Arc::new(Semaphore::new(permits));
        let mut tasks = JoinSet::new();

        for (index, entry) in candidates {
            let prober = self.prober.clone();
            let limit = limit.clone();
            tasks.spawn(async move {
                let Ok(_permit) = limit.acquire_owned().await else {
                    return None;
                };
                if prober.probe(entry.ip).await {
                    Some((index, entry))
                } else {
                    None
                }
            });
        }

        let mut confirmed = Vec::new();
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Some(hit)) => confirmed.push(hit),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "Probe task failed"),
            }
        }
        confirmed.sort_by_key(|(index, _)| *index);

        let devices: Vec<ConfirmedDevice> = confirmed
            .into_iter()
            .map(|(_, entry)| {
                info!(ip = %entry.ip, "Found camera");
                ConfirmedDevice::from(entry)
            })
            .collect();

        info!(
            "Scan complete: {} of {} candidates confirmed",
            devices.len(),
            total
        );
        devices
    }
}
