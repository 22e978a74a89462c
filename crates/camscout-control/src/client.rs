//! Process-wide HTTP client for camera requests

use reqwest::StatusCode;
use std::net::Ipv4Addr;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Default timeout for camera commands
pub const COMMAND_TIMEOUT_MS: u64 = 1000;

/// Default camera HTTP port
pub const CAMERA_PORT: u16 = 80;

#[derive(Error, Debug)]
pub enum ControlError {
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Camera rejected {url} with status {status}")]
    Rejected { url: String, status: StatusCode },
    #[error("Invalid response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// HTTP client shared by discovery probes and camera commands.
///
/// Built once at startup; clones share one connection pool, which is released
/// when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct CameraClient {
    http: reqwest::Client,
    port: u16,
    command_timeout: Duration,
}

impl CameraClient {
    pub fn with_settings(port: u16, command_timeout: Duration) -> Result<Self, ControlError> {
        // Cameras live on the local segment; never route through a proxy.
        // Redirects are reported as-is: only a direct 200 confirms a camera.
        let http = reqwest::Client::builder()
            .no_proxy()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("camscout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ControlError::Client)?;

        debug!(port, timeout_ms = command_timeout.as_millis() as u64, "HTTP client ready");
        Ok(Self {
            http,
            port,
            command_timeout,
        })
    }

    /// Underlying reqwest client, for sharing with the liveness prober
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Build a URL for a path on a camera (path includes the leading '/')
    pub fn url(&self, ip: Ipv4Addr, path: &str) -> String {
        if self.port == CAMERA_PORT {
            format!("http://{}{}", ip, path)
        } else {
            format!("http://{}:{}{}", ip, self.port, path)
        }
    }

    /// GET a camera path and require a 200 response
    pub(crate) async fn get_ok(
        &self,
        ip: Ipv4Addr,
        path: &str,
    ) -> Result<reqwest::Response, ControlError> {
        let url = self.url(ip, path);
        let response = self
            .http
            .get(&url)
            .timeout(self.command_timeout)
            .send()
            .await
            .map_err(|source| ControlError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ControlError::Rejected { url, status });
        }
        Ok(response)
    }
}
