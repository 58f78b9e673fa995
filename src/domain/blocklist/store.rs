use async_trait::async_trait;

use super::address::IpAddress;
use super::error::BlocklistError;
use super::models::{BlocklistEntry, BlocklistSnapshot, Insertion};

mod memory;

pub use memory::{DEFAULT_MAX_ENTRIES, MemoryStore};

type Result<T> = std::result::Result<T, BlocklistError>;

/// Abstract interface for blocklist storage backends.
///
/// Every method is atomic with respect to every other method: a reader never
/// observes a half-applied insert or removal. Addresses reaching a store have
/// already been validated and canonicalized.
#[async_trait]
pub trait BlocklistStore: Send + Sync + 'static {
    /// Adds the address unless it is already present.
    ///
    /// An existing entry is returned unchanged as [`Insertion::AlreadyPresent`].
    async fn insert(&self, ip: IpAddress) -> Result<Insertion>;

    /// Removes the address and returns the entry that was stored.
    ///
    /// Fails with [`BlocklistError::NotFound`] when the address is absent.
    async fn remove(&self, ip: IpAddress) -> Result<BlocklistEntry>;

    /// Returns a copy of the entry for the address, if present.
    async fn get(&self, ip: IpAddress) -> Result<Option<BlocklistEntry>>;

    /// Returns a consistent copy of all entries in insertion order.
    async fn snapshot(&self) -> Result<BlocklistSnapshot>;

    /// Returns the number of blocked addresses.
    async fn len(&self) -> Result<usize>;
}
