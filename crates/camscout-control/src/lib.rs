//! camscout control - HTTP commands for discovered cameras
//!
//! Owns the process-wide HTTP client and wraps the camera's control
//! endpoints (shutter, info).

pub mod client;
pub mod command;
pub mod info;

#[cfg(test)]
mod testing;

pub use client::{CameraClient, ControlError, CAMERA_PORT, COMMAND_TIMEOUT_MS};
pub use command::Shutter;
pub use info::{CameraInfo, GENERIC_MODEL};
