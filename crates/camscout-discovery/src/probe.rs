//! HTTP liveness probing for camera verification

use async_trait::async_trait;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Probe timeout in milliseconds
pub const PROBE_TIMEOUT_MS: u64 = 500;

/// Camera status endpoint
pub const STATUS_PATH: &str = "/gp/gpControl/status";

/// Default HTTP port for the status endpoint
pub const HTTP_PORT: u16 = 80;

/// Why a probe did not produce a status code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    Timeout,
    Connect(String),
    Transport(String),
}

/// Issues the body-less status request used to confirm liveness
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Send a HEAD request and return the response status code
    async fn head_status(&self, url: &str, timeout: Duration) -> Result<u16, ProbeFailure>;
}

/// Probe transport over a shared reqwest client.
///
/// The client must not follow redirects, or a 3xx leading to a 200 page
/// would confirm a host that never answered 200 itself.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProbeTransport for HttpTransport {
    async fn head_status(&self, url: &str, timeout: Duration) -> Result<u16, ProbeFailure> {
        match self.client.head(url).timeout(timeout).send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) if e.is_timeout() => Err(ProbeFailure::Timeout),
            Err(e) if e.is_connect() => Err(ProbeFailure::Connect(e.to_string())),
            Err(e) => Err(ProbeFailure::Transport(e.to_string())),
        }
    }
}

/// Confirms that a candidate answers on the camera status endpoint
#[derive(Clone)]
pub struct LivenessProber {
    transport: Arc<dyn ProbeTransport>,
    port: u16,
    status_path: String,
    timeout: Duration,
}

impl LivenessProber {
    pub fn new(transport: Arc<dyn ProbeTransport>) -> Self {
        Self {
            transport,
            port: HTTP_PORT,
            status_path: STATUS_PATH.to_string(),
            timeout: Duration::from_millis(PROBE_TIMEOUT_MS),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_status_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.status_path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Status URL for a candidate IP
    pub fn status_url(&self, ip: Ipv4Addr) -> String {
        if self.port == HTTP_PORT {
            format!("http://{}{}", ip, self.status_path)
        } else {
            format!("http://{}:{}{}", ip, self.port, self.status_path)
        }
    }

    /// Probe with the configured timeout
    pub async fn probe(&self, ip: Ipv4Addr) -> bool {
        self.probe_within(ip, self.timeout).await
    }

    /// Probe with an explicit timeout in milliseconds
    pub async fn probe_with_timeout(&self, ip: Ipv4Addr, timeout_ms: u64) -> bool {
        self.probe_within(ip, Duration::from_millis(timeout_ms)).await
    }

    // Every failure mode collapses to `false`; one dead host must not stop a scan.
    async fn probe_within(&self, ip: Ipv4Addr, timeout: Duration) -> bool {
        let url = self.status_url(ip);
        match self.transport.head_status(&url, timeout).await {
            Ok(200) => {
                trace!(ip = %ip, "Status endpoint answered 200");
                true
            }
            Ok(status) => {
                debug!(ip = %ip, status, "Status endpoint returned non-200");
                false
            }
            Err(ProbeFailure::Timeout) => {
                debug!(ip = %ip, timeout_ms = timeout.as_millis() as u64, "Probe timed out");
                false
            }
            Err(ProbeFailure::Connect(e)) => {
                debug!(ip = %ip, error = %e, "Probe connection failed");
                false
            }
            Err(ProbeFailure::Transport(e)) => {
                debug!(ip = %ip, error = %e, "Probe failed");
                false
            }
        }
    }
}
