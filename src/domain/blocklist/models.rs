use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::address::IpAddress;

/// Entry in the blocklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlocklistEntry {
    /// Canonical form of the blocked address
    pub ip: IpAddress,

    /// Date when the address was added to the blocklist
    pub added_at: DateTime<Utc>,
}

impl BlocklistEntry {
    /// Create a new blocklist entry stamped with the current time
    pub fn new(ip: IpAddress) -> Self {
        Self {
            ip,
            added_at: Utc::now(),
        }
    }
}

/// Outcome of an add operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The address was not present and has been added.
    Inserted(BlocklistEntry),
    /// The address was already blocked; the stored entry is left untouched.
    AlreadyPresent(BlocklistEntry),
}

impl Insertion {
    pub fn entry(&self) -> &BlocklistEntry {
        match self {
            Insertion::Inserted(entry) | Insertion::AlreadyPresent(entry) => entry,
        }
    }

    pub fn into_entry(self) -> BlocklistEntry {
        match self {
            Insertion::Inserted(entry) | Insertion::AlreadyPresent(entry) => entry,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Insertion::Inserted(_))
    }
}

/// Point-in-time copy of the blocklist, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BlocklistSnapshot {
    /// Value of the store's mutation counter when the copy was taken
    pub revision: u64,

    pub entries: Vec<BlocklistEntry>,
}

impl BlocklistSnapshot {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the blocked addresses in insertion order.
    pub fn addresses(&self) -> impl Iterator<Item = IpAddress> + '_ {
        self.entries.iter().map(|entry| entry.ip)
    }
}
