//! Confirmed camera devices

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

use crate::entry::AddressTableEntry;

/// A camera that matched a vendor prefix and answered the status probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedDevice {
    /// IPv4 address of the device
    pub ip: Ipv4Addr,
    /// Hardware address seen in the address table
    pub hardware_address: String,
}

impl ConfirmedDevice {
    pub fn new(ip: Ipv4Addr, hardware_address: impl Into<String>) -> Self {
        Self {
            ip,
            hardware_address: hardware_address.into(),
        }
    }
}

impl From<AddressTableEntry> for ConfirmedDevice {
    fn from(entry: AddressTableEntry) -> Self {
        Self {
            ip: entry.ip,
            hardware_address: entry.hardware_address,
        }
    }
}

impl std::fmt::Display for ConfirmedDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ip)
    }
}
