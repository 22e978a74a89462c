//! camscout core - shared types for camera discovery
//!
//! This crate provides the data model used across camscout:
//! - Address-table entries parsed from the host neighbor cache
//! - Vendor hardware-address prefixes used to pick out camera candidates
//! - Confirmed devices, the output of a discovery pass

pub mod device;
pub mod entry;
pub mod vendor;

pub use device::ConfirmedDevice;
pub use entry::{leading_octets, normalize_hardware_address, AddressTableEntry};
pub use vendor::{VendorPrefix, VendorPrefixError, VendorPrefixSet};
