//! Vendor prefix filtering

use camscout_core::{leading_octets, VendorPrefixSet};

/// Check whether a hardware address belongs to one of the configured vendors.
///
/// Only the first three octets are compared, case-insensitively.
pub fn is_known_vendor(hardware_address: &str, prefixes: &VendorPrefixSet) -> bool {
    match leading_octets(hardware_address) {
        Some(octets) => prefixes.contains(octets),
        None => false,
    }
}
