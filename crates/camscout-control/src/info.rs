//! Camera info query

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use tracing::debug;

use crate::client::{CameraClient, ControlError};

/// Camera info endpoint
pub const INFO_PATH: &str = "/gp/gpControl/info";

/// Label used when a camera does not report its model
pub const GENERIC_MODEL: &str = "GoPro";

/// General camera info
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraInfo {
    #[serde(default)]
    pub model_number: Option<u32>,
    #[serde(default)]
    pub model_name: Option<String>,
    #[serde(default)]
    pub firmware_version: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default, alias = "ap_mac_addr")]
    pub ap_mac: Option<String>,
    #[serde(default)]
    pub ap_ssid: Option<String>,
}

impl CameraInfo {
    /// Model name for display
    pub fn label(&self) -> &str {
        self.model_name.as_deref().unwrap_or(GENERIC_MODEL)
    }
}

// Older firmware wraps the fields in an "info" object
#[derive(Deserialize)]
#[serde(untagged)]
enum InfoRsp {
    Wrapped { info: CameraInfo },
    Flat(CameraInfo),
}

impl From<InfoRsp> for CameraInfo {
    fn from(rsp: InfoRsp) -> Self {
        match rsp {
            InfoRsp::Wrapped { info } => info,
            InfoRsp::Flat(info) => info,
        }
    }
}

impl CameraClient {
    /// Fetch model and firmware details from a camera
    pub async fn camera_info(&self, ip: Ipv4Addr) -> Result<CameraInfo, ControlError> {
        let response = self.get_ok(ip, INFO_PATH).await?;
        let rsp: InfoRsp = response
            .json()
            .await
            .map_err(|source| ControlError::Decode {
                url: self.url(ip, INFO_PATH),
                source,
            })?;
        let info = CameraInfo::from(rsp);
        debug!(ip = %ip, model = info.label(), "Camera info");
        Ok(info)
    }

    /// Model label for a camera, falling back to the generic name on any failure
    pub async fn model_label(&self, ip: Ipv4Addr) -> String {
        match self.camera_info(ip).await {
            Ok(info) => info.label().to_string(),
            Err(e) => {
                debug!(ip = %ip, error = %e, "Camera info unavailable");
                GENERIC_MODEL.to_string()
            }
        }
    }
}
