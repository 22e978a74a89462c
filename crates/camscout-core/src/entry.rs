//! Address-table entries and hardware address helpers

use std::net::Ipv4Addr;

/// One resolved neighbor from the host's address-resolution table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTableEntry {
    /// Neighbor IPv4 address
    pub ip: Ipv4Addr,
    /// Hardware address, lowercase two-digit octets joined by ':'
    pub hardware_address: String,
    /// Original line as read from the table
    pub raw: String,
}

impl AddressTableEntry {
    /// Create an entry, normalizing the hardware address when possible
    pub fn new(ip: Ipv4Addr, hardware_address: &str, raw: &str) -> Self {
        let hardware_address = normalize_hardware_address(hardware_address)
            .unwrap_or_else(|| hardware_address.to_lowercase());
        Self {
            ip,
            hardware_address,
            raw: raw.trim_end_matches(['\r', '\n']).to_string(),
        }
    }
}

/// Split a hardware address into octets.
///
/// Accepts ':' or '-' separators and one or two hex digits per octet
/// (BSD `arp` prints `a4:5e:60:1:2:3`).
fn octets(addr: &str) -> impl Iterator<Item = Option<u8>> + '_ {
    addr.trim().split([':', '-']).map(|part| {
        if part.is_empty() || part.len() > 2 {
            return None;
        }
        u8::from_str_radix(part, 16).ok()
    })
}

/// Normalize a six-octet hardware address to `aa:bb:cc:dd:ee:ff`
pub fn normalize_hardware_address(addr: &str) -> Option<String> {
    let parsed: Option<Vec<u8>> = octets(addr).collect();
    let parsed = parsed?;
    if parsed.len() != 6 {
        return None;
    }
    Some(
        parsed
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<Vec<_>>()
            .join(":"),
    )
}

/// First three octets of a hardware address (the vendor part)
pub fn leading_octets(addr: &str) -> Option<[u8; 3]> {
    let mut it = octets(addr);
    let a = it.next()??;
    let b = it.next()??;
    let c = it.next()??;
    Some([a, b, c])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_full_address() {
        assert_eq!(
            normalize_hardware_address("A4:5E:60:11:22:33").as_deref(),
            Some("a4:5e:60:11:22:33")
        );
    }

    #[test]
    fn test_normalize_zero_stripped() {
        assert_eq!(
            normalize_hardware_address("a4:5e:60:1:2:3").as_deref(),
            Some("a4:5e:60:01:02:03")
        );
    }

    #[test]
    fn test_normalize_rejects_bad_input() {
        assert!(normalize_hardware_address("a4:5e:60:11:22").is_none());
        assert!(normalize_hardware_address("a4:5e:60:11:22:zz").is_none());
        assert!(normalize_hardware_address("a4:5e:60:11:22:333").is_none());
        assert!(normalize_hardware_address("").is_none());
    }

    #[test]
    fn test_leading_octets() {
        assert_eq!(leading_octets("30-23-03-aa-bb-cc"), Some([0x30, 0x23, 0x03]));
        assert_eq!(leading_octets("30:23"), None);
        assert_eq!(leading_octets("incomplete"), None);
    }

    #[test]
    fn test_entry_strips_newline() {
        let entry = AddressTableEntry::new(
            Ipv4Addr::new(10, 5, 5, 9),
            "A4:5E:60:11:22:33",
            "? (10.5.5.9) at a4:5e:60:11:22:33 on en0\n",
        );
        assert_eq!(entry.hardware_address, "a4:5e:60:11:22:33");
        assert_eq!(entry.raw, "? (10.5.5.9) at a4:5e:60:11:22:33 on en0");
    }
}
