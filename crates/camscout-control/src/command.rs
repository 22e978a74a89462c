//! Camera commands

use std::fmt;
use std::net::Ipv4Addr;
use tracing::{info, warn};

use crate::client::{CameraClient, ControlError};

/// Shutter state to request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutter {
    /// Start recording (`p=1`)
    Start,
    /// Stop recording (`p=0`)
    Stop,
}

impl Shutter {
    pub fn path(&self) -> &'static str {
        match self {
            Shutter::Start => "/gp/gpControl/command/shutter?p=1",
            Shutter::Stop => "/gp/gpControl/command/shutter?p=0",
        }
    }
}

impl fmt::Display for Shutter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shutter::Start => write!(f, "start"),
            Shutter::Stop => write!(f, "stop"),
        }
    }
}

impl CameraClient {
    /// Send a shutter command. The outcome is returned, never retried.
    pub async fn set_shutter(&self, ip: Ipv4Addr, shutter: Shutter) -> Result<(), ControlError> {
        match self.get_ok(ip, shutter.path()).await {
            Ok(_) => {
                info!(ip = %ip, shutter = %shutter, "Shutter command accepted");
                Ok(())
            }
            Err(e) => {
                warn!(ip = %ip, shutter = %shutter, error = %e, "Shutter command failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::serve;
    use std::time::Duration;

    #[test]
    fn test_shutter_paths() {
        assert_eq!(Shutter::Start.path(), "/gp/gpControl/command/shutter?p=1");
        assert_eq!(Shutter::Stop.path(), "/gp/gpControl/command/shutter?p=0");
    }

    #[tokio::test]
    async fn test_start_recording() {
        let (port, requests) = serve("200 OK", "{}").await;
        let client = CameraClient::with_settings(port, Duration::from_millis(500)).unwrap();
        client
            .set_shutter(Ipv4Addr::LOCALHOST, Shutter::Start)
            .await
            .unwrap();

        let seen = requests.lock().unwrap().clone();
        assert_eq!(seen, vec!["GET /gp/gpControl/command/shutter?p=1"]);
    }

    #[tokio::test]
    async fn test_stop_recording() {
        let (port, requests) = serve("200 OK", "{}").await;
        let client = CameraClient::with_settings(port, Duration::from_millis(500)).unwrap();
        client
            .set_shutter(Ipv4Addr::LOCALHOST, Shutter::Stop)
            .await
            .unwrap();

        let seen = requests.lock().unwrap().clone();
        assert_eq!(seen, vec!["GET /gp/gpControl/command/shutter?p=0"]);
    }

    #[tokio::test]
    async fn test_rejected_command() {
        let (port, _) = serve("403 Forbidden", "").await;
        let client = CameraClient::with_settings(port, Duration::from_millis(500)).unwrap();
        let err = client
            .set_shutter(Ipv4Addr::LOCALHOST, Shutter::Start)
            .await
            .unwrap_err();
        assert!(matches!(err, ControlError::Rejected { status, .. } if status.as_u16() == 403));
    }

    #[tokio::test]
    async fn test_unreachable_camera() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = CameraClient::with_settings(port, Duration::from_millis(500)).unwrap();
        let err = client
            .set_shutter(Ipv4Addr::LOCALHOST, Shutter::Start)
            .await
            .unwrap_err();
        assert!(matches!(err, ControlError::Request { .. }));
    }
}
