//! camscout discovery - find cameras in the host neighbor table
//!
//! A discovery pass runs these stages in order:
//! - Read the address-resolution table (`arp -a` or an in-memory fixture)
//! - Parse each line into an IP / hardware address pair
//! - Keep entries whose hardware address has a known vendor prefix
//! - Confirm liveness with an HTTP probe of the camera status endpoint

pub mod arp;
pub mod probe;
pub mod scanner;
pub mod vendor;

pub use arp::{
    parse_arp_line, AddressTableDump, AddressTableSource, ArpCommand, DiscoveryError, StaticTable,
};
pub use probe::{HttpTransport, LivenessProber, ProbeFailure, ProbeTransport};
pub use scanner::{DiscoveryScanner, ScannerConfig};
pub use vendor::is_known_vendor;
