//! Address-table reading and parsing
//!
//! The host neighbor cache is read through an [`AddressTableSource`]. The live
//! source runs `arp -a`; [`StaticTable`] serves fixed text for tests and
//! offline use.

use async_trait::async_trait;
use camscout_core::AddressTableEntry;
use regex::Regex;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace};

/// Default time allowed for the address-table utility to finish
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5000;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Address table unavailable ({program}): {reason}")]
    EnvironmentUnavailable { program: String, reason: String },
}

/// Raw address-table text captured at read time.
///
/// Consumed by iteration; a fresh read is needed to see the table again.
#[derive(Debug, Clone, Default)]
pub struct AddressTableDump {
    lines: Vec<String>,
}

impl AddressTableDump {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl IntoIterator for AddressTableDump {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.into_iter()
    }
}

/// Something that can produce the current neighbor table
#[async_trait]
pub trait AddressTableSource: Send + Sync {
    async fn read(&self) -> Result<AddressTableDump, DiscoveryError>;
}

/// Live source backed by an external utility (`arp -a` by default)
#[derive(Debug, Clone)]
pub struct ArpCommand {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl ArpCommand {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    fn unavailable(&self, reason: impl Into<String>) -> DiscoveryError {
        DiscoveryError::EnvironmentUnavailable {
            program: self.program.clone(),
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl AddressTableSource for ArpCommand {
    async fn read(&self) -> Result<AddressTableDump, DiscoveryError> {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args).kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(self.unavailable(e.to_string())),
            Err(_) => {
                return Err(self.unavailable(format!(
                    "timed out after {} ms",
                    self.timeout.as_millis()
                )))
            }
        };

        if !output.status.success() {
            return Err(self.unavailable(format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let dump = AddressTableDump::from_text(&String::from_utf8_lossy(&output.stdout));
        debug!(program = %self.program, lines = dump.len(), "Read address table");
        Ok(dump)
    }
}

/// In-memory address table
#[derive(Debug, Clone, Default)]
pub struct StaticTable {
    text: Option<String>,
}

impl StaticTable {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    pub fn from_lines<S: AsRef<str>>(lines: impl IntoIterator<Item = S>) -> Self {
        let text = lines
            .into_iter()
            .map(|l| l.as_ref().to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self::new(text)
    }

    /// A table whose reads always fail, as when the utility is missing
    pub fn unavailable() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl AddressTableSource for StaticTable {
    async fn read(&self) -> Result<AddressTableDump, DiscoveryError> {
        match &self.text {
            Some(text) => Ok(AddressTableDump::from_text(text)),
            None => Err(DiscoveryError::EnvironmentUnavailable {
                program: "static".to_string(),
                reason: "no address table configured".to_string(),
            }),
        }
    }
}

// IP inside the first pair of parentheses
static IP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(([^)]*)\)").expect("valid IP pattern")
});

// Six colon-separated octets, not embedded in a longer hex run
static HW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[^0-9a-f:])([0-9a-f]{1,2}(?::[0-9a-f]{1,2}){5})(?:$|[^0-9a-f:])")
        .expect("valid hardware address pattern")
});

/// Parse one line of `arp -a` output.
///
/// Format: "hostname (192.168.1.50) at a4:5e:60:11:22:33 [ether] on en0".
/// Headers, blank lines and incomplete entries yield `None`.
pub fn parse_arp_line(line: &str) -> Option<AddressTableEntry> {
    let ip_text = IP_PATTERN.captures(line)?.get(1)?.as_str().trim();
    let ip = match Ipv4Addr::from_str(ip_text) {
        Ok(ip) => ip,
        Err(_) => {
            trace!(line, "Skipping line without IPv4 address");
            return None;
        }
    };

    let Some(hw) = HW_PATTERN.captures(line).and_then(|c| c.get(1)) else {
        trace!(ip = %ip, "Skipping entry without hardware address");
        return None;
    };

    Some(AddressTableEntry::new(ip, hw.as_str(), line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_macos_line() {
        let line = "? (192.168.1.50) at a4:5e:60:11:22:33 on en0 ifscope [ethernet]";
        let entry = parse_arp_line(line).unwrap();
        assert_eq!(entry.ip, Ipv4Addr::new(192, 168, 1, 50));
        assert_eq!(entry.hardware_address, "a4:5e:60:11:22:33");
        assert_eq!(entry.raw, line);
    }

    #[test]
    fn test_parse_linux_line() {
        let line = "gopro.lan (10.5.5.9) at 30:23:03:AA:BB:CC [ether] on wlan0";
        let entry = parse_arp_line(line).unwrap();
        assert_eq!(entry.ip, Ipv4Addr::new(10, 5, 5, 9));
        assert_eq!(entry.hardware_address, "30:23:03:aa:bb:cc");
    }

    #[test]
    fn test_parse_zero_stripped_octets() {
        let line = "? (192.168.1.7) at a4:5e:60:1:2:3 on en0 ifscope [ethernet]";
        let entry = parse_arp_line(line).unwrap();
        assert_eq!(entry.hardware_address, "a4:5e:60:01:02:03");
    }

    #[test]
    fn test_parse_incomplete_entry() {
        let line = "? (192.168.1.9) at (incomplete) on en0 ifscope [ethernet]";
        assert!(parse_arp_line(line).is_none());
        assert!(parse_arp_line("? (192.168.1.9) at <incomplete> on eth0").is_none());
    }

    #[test]
    fn test_parse_noise() {
        assert!(parse_arp_line("").is_none());
        assert!(parse_arp_line("   ").is_none());
        assert!(parse_arp_line("Address HWtype HWaddress Flags Mask Iface").is_none());
        assert!(parse_arp_line("Interface: 192.168.1.2 --- 0x4").is_none());
        assert!(parse_arp_line("a4:5e:60:11:22:33 without ip").is_none());
        assert!(parse_arp_line("(not-an-ip) at a4:5e:60:11:22:33").is_none());
        assert!(parse_arp_line("? (fe80::1) at a4:5e:60:11:22:33 on en0").is_none());
        assert!(parse_arp_line("? (300.1.1.1) at a4:5e:60:11:22:33 on en0").is_none());
    }

    #[test]
    fn test_parse_rejects_long_hex_run() {
        // Seven octets is not a hardware address
        assert!(parse_arp_line("? (192.168.1.9) at a4:5e:60:11:22:33:44 on en0").is_none());
        assert!(parse_arp_line("? (192.168.1.9) at a4:5e:60:11:22 on en0").is_none());
    }

    #[tokio::test]
    async fn test_static_table_read() {
        let table = StaticTable::from_lines(["first", "second"]);
        let lines: Vec<String> = table.read().await.unwrap().into_iter().collect();
        assert_eq!(lines, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_static_table_unavailable() {
        let err = StaticTable::unavailable().read().await.unwrap_err();
        assert!(matches!(err, DiscoveryError::EnvironmentUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_missing_utility_is_unavailable() {
        let source = ArpCommand::new(
            "camscout-no-such-arp-utility",
            Vec::new(),
            Duration::from_secs(1),
        );
        let err = source.read().await.unwrap_err();
        assert!(matches!(err, DiscoveryError::EnvironmentUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_unavailable() {
        let source = ArpCommand::new("false", Vec::new(), Duration::from_secs(1));
        let err = source.read().await.unwrap_err();
        let DiscoveryError::EnvironmentUnavailable { program, reason } = err;
        assert_eq!(program, "false");
        assert!(reason.contains("exit status"), "reason: {reason}");
    }

    #[tokio::test]
    async fn test_slow_utility_times_out() {
        let source = ArpCommand::new(
            "sleep",
            vec!["5".to_string()],
            Duration::from_millis(100),
        );
        let started = std::time::Instant::now();
        let err = source.read().await.unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(2));
        let DiscoveryError::EnvironmentUnavailable { reason, .. } = err;
        assert_eq!(reason, "timed out after 100 ms");
    }

    #[tokio::test]
    async fn test_utility_output_is_read() {
        let source = ArpCommand::new(
            "echo",
            vec!["? (192.168.1.50) at a4:5e:60:11:22:33 on en0".to_string()],
            Duration::from_secs(1),
        );
        let lines: Vec<String> = source.read().await.unwrap().into_iter().collect();
        assert_eq!(lines, vec!["? (192.168.1.50) at a4:5e:60:11:22:33 on en0"]);
    }
}
