use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use super::error::BlocklistError;

/// A syntactically valid IPv4 or IPv6 address.
///
/// Parsing accepts dotted-quad IPv4 and colon-hex IPv6 (including the `::`
/// compressed forms and an embedded IPv4 tail). Two spellings of the same
/// address compare equal, hash equally and render to the same canonical text
/// (RFC 5952 for IPv6), so the value can be used directly as a lookup key.
///
/// Rejected input: empty strings, out-of-range or zero-prefixed octets, wrong
/// segment counts, surrounding whitespace, zone identifiers and prefix lengths.
///
/// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) stay IPv6 and are not folded
/// onto their IPv4 counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IpAddress(IpAddr);

impl IpAddress {
    /// Parses and validates a textual address.
    pub fn parse(input: &str) -> Result<Self, BlocklistError> {
        if input.is_empty() {
            return Err(BlocklistError::InvalidAddress {
                input: String::new(),
                reason: "address is empty",
            });
        }

        input
            .parse::<IpAddr>()
            .map(Self)
            .map_err(|_| BlocklistError::InvalidAddress {
                input: input.to_string(),
                reason: "not a valid IPv4 or IPv6 address",
            })
    }
}

impl FromStr for IpAddress {
    type Err = BlocklistError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for IpAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for IpAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(de::Error::custom)
    }
}
