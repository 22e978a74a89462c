//! Vendor hardware-address prefixes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::entry::leading_octets;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VendorPrefixError {
    #[error("Invalid vendor prefix '{0}': expected three hex octets like a4:5e:60")]
    Invalid(String),
}

/// First three octets of a hardware address, assigned to one manufacturer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VendorPrefix([u8; 3]);

impl VendorPrefix {
    pub const fn new(octets: [u8; 3]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 3] {
        self.0
    }
}

impl FromStr for VendorPrefix {
    type Err = VendorPrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Exactly three octets; a full address is not a prefix
        if s.trim().split([':', '-']).count() != 3 {
            return Err(VendorPrefixError::Invalid(s.to_string()));
        }
        leading_octets(s)
            .map(Self)
            .ok_or_else(|| VendorPrefixError::Invalid(s.to_string()))
    }
}

impl TryFrom<String> for VendorPrefix {
    type Error = VendorPrefixError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VendorPrefix> for String {
    fn from(prefix: VendorPrefix) -> Self {
        prefix.to_string()
    }
}

impl fmt::Display for VendorPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}", a, b, c)
    }
}

/// Camera vendor prefixes recognized out of the box
pub const DEFAULT_VENDOR_PREFIXES: [VendorPrefix; 2] = [
    VendorPrefix::new([0x30, 0x23, 0x03]),
    VendorPrefix::new([0xa4, 0x5e, 0x60]),
];

/// Immutable set of vendor prefixes, fixed at startup.
///
/// Keeps configuration order and drops duplicates. Sets are expected to be
/// small, so lookup is a linear scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<VendorPrefix>", into = "Vec<VendorPrefix>")]
pub struct VendorPrefixSet {
    prefixes: Vec<VendorPrefix>,
}

impl VendorPrefixSet {
    pub fn new(prefixes: impl IntoIterator<Item = VendorPrefix>) -> Self {
        let mut unique: Vec<VendorPrefix> = Vec::new();
        for prefix in prefixes {
            if !unique.contains(&prefix) {
                unique.push(prefix);
            }
        }
        Self { prefixes: unique }
    }

    /// Parse a list of textual prefixes, failing on the first invalid one
    pub fn parse<S: AsRef<str>>(
        prefixes: impl IntoIterator<Item = S>,
    ) -> Result<Self, VendorPrefixError> {
        let parsed = prefixes
            .into_iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<VendorPrefix>, _>>()?;
        Ok(Self::new(parsed))
    }

    pub fn contains(&self, octets: [u8; 3]) -> bool {
        self.prefixes.iter().any(|p| p.0 == octets)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VendorPrefix> {
        self.prefixes.iter()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl Default for VendorPrefixSet {
    fn default() -> Self {
        Self::new(DEFAULT_VENDOR_PREFIXES)
    }
}

impl From<Vec<VendorPrefix>> for VendorPrefixSet {
    fn from(prefixes: Vec<VendorPrefix>) -> Self {
        Self::new(prefixes)
    }
}

impl From<VendorPrefixSet> for Vec<VendorPrefix> {
    fn from(set: VendorPrefixSet) -> Self {
        set.prefixes
    }
}
