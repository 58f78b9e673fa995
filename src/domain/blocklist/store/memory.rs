use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use super::{BlocklistStore, Result};
use crate::domain::blocklist::address::IpAddress;
use crate::domain::blocklist::error::BlocklistError;
use crate::domain::blocklist::models::{BlocklistEntry, BlocklistSnapshot, Insertion};

/// An in-memory blocklist store.
///
/// Entries are indexed by address for O(1) membership checks and by insertion
/// sequence number for ordered listing. Both indexes live behind one
/// readers-writer lock that is never held across an `.await`. The store holds
/// at most `max_entries` distinct addresses.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<Entries>>,
    max_entries: usize,
}

#[derive(Debug, Default)]
struct Entries {
    by_addr: HashMap<IpAddress, Slot>,
    order: BTreeMap<u64, IpAddress>,
    next_seq: u64,
    revision: u64,
}

#[derive(Debug)]
struct Slot {
    seq: u64,
    entry: BlocklistEntry,
}

pub const DEFAULT_MAX_ENTRIES: usize = 1024;

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            inner: Arc::default(),
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of distinct addresses the store will hold
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries;
        self
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Entries>> {
        self.inner
            .read()
            .map_err(|e| BlocklistError::internal(format!("blocklist read lock: {e}")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Entries>> {
        self.inner
            .write()
            .map_err(|e| BlocklistError::internal(format!("blocklist write lock: {e}")))
    }
}

impl Entries {
    fn insert(&mut self, ip: IpAddress, max_entries: usize) -> Result<Insertion> {
        if let Some(slot) = self.by_addr.get(&ip) {
            self.revision += 1;
            return Ok(Insertion::AlreadyPresent(slot.entry.clone()));
        }

        if self.by_addr.len() >= max_entries {
            return Err(BlocklistError::Full { ip, max_entries });
        }

        self.revision += 1;
        let seq = self.next_seq;
        self.next_seq += 1;

        let entry = BlocklistEntry::new(ip);
        self.order.insert(seq, ip);
        self.by_addr.insert(
            ip,
            Slot {
                seq,
                entry: entry.clone(),
            },
        );
        Ok(Insertion::Inserted(entry))
    }

    fn remove(&mut self, ip: IpAddress) -> Option<BlocklistEntry> {
        let slot = self.by_addr.remove(&ip)?;
        self.order.remove(&slot.seq);
        self.revision += 1;
        Some(slot.entry)
    }

    fn snapshot(&self) -> BlocklistSnapshot {
        let entries = self
            .order
            .values()
            .filter_map(|ip| self.by_addr.get(ip))
            .map(|slot| slot.entry.clone())
            .collect();

        BlocklistSnapshot {
            revision: self.revision,
            entries,
        }
    }
}

#[async_trait]
impl BlocklistStore for MemoryStore {
    async fn insert(&self, ip: IpAddress) -> Result<Insertion> {
        self.write()?.insert(ip, self.max_entries)
    }

    async fn remove(&self, ip: IpAddress) -> Result<BlocklistEntry> {
        self.write()?
            .remove(ip)
            .ok_or(BlocklistError::NotFound(ip))
    }

    async fn get(&self, ip: IpAddress) -> Result<Option<BlocklistEntry>> {
        Ok(self.read()?.by_addr.get(&ip).map(|slot| slot.entry.clone()))
    }

    async fn snapshot(&self) -> Result<BlocklistSnapshot> {
        Ok(self.read()?.snapshot())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.read()?.by_addr.len())
    }
}
