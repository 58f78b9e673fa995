use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::address::IpAddress;
use super::context::RequestContext;
use super::error::BlocklistError;
use super::models::{BlocklistEntry, BlocklistSnapshot, Insertion};
use super::store::{BlocklistStore, MemoryStore};

type Result<T> = std::result::Result<T, BlocklistError>;

/// Validating front of a [`BlocklistStore`].
///
/// Every operation validates its input before it touches the store. Point
/// operations and mutations check the caller's [`RequestContext`] right before
/// each store call.
/// Cloning is cheap; clones share the same store.
#[derive(Debug)]
pub struct BlocklistService<S: BlocklistStore = MemoryStore> {
    store: Arc<S>,
}

impl<S: BlocklistStore> Clone for BlocklistService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl BlocklistService<MemoryStore> {
    /// Creates a service over a fresh, empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }
}

impl<S: BlocklistStore> BlocklistService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Blocks an address. Adding an address that is already blocked succeeds
    /// and leaves the existing entry untouched.
    #[instrument(skip(self, ctx))]
    pub async fn add(&self, ctx: &RequestContext, ip: &str) -> Result<Insertion> {
        let ip = parse(ip)?;
        ctx.check()?;

        let insertion = self.store.insert(ip).await?;
        if insertion.is_new() {
            info!(%ip, "Address added to blocklist");
        } else {
            debug!(%ip, "Address already blocked");
        }
        Ok(insertion)
    }

    /// Blocks every address in `ips`.
    ///
    /// All addresses are validated before the first one is added, so a
    /// malformed address leaves the store unchanged. The context is checked
    /// between additions; on expiry the addresses added so far stay blocked.
    /// Returns the number of newly blocked addresses.
    #[instrument(skip_all, fields(count = ips.len()))]
    pub async fn add_all<T: AsRef<str>>(&self, ctx: &RequestContext, ips: &[T]) -> Result<usize> {
        let parsed = ips
            .iter()
            .map(|ip| parse(ip.as_ref()))
            .collect::<Result<Vec<_>>>()?;

        let mut added = 0;
        for ip in parsed {
            ctx.check()?;
            if self.store.insert(ip).await?.is_new() {
                added += 1;
            }
        }

        info!(added, "Addresses added to blocklist");
        Ok(added)
    }

    /// Unblocks an address.
    #[instrument(skip(self, ctx))]
    pub async fn remove(&self, ctx: &RequestContext, ip: &str) -> Result<BlocklistEntry> {
        let ip = parse(ip)?;
        ctx.check()?;

        let entry = self.store.remove(ip).await?;
        info!(%ip, "Address removed from blocklist");
        Ok(entry)
    }

    /// Looks up a single address; fails with [`BlocklistError::NotFound`]
    /// when it is not blocked.
    pub async fn get(&self, ctx: &RequestContext, ip: &str) -> Result<BlocklistEntry> {
        let ip = parse(ip)?;
        ctx.check()?;
        self.store.get(ip).await?.ok_or(BlocklistError::NotFound(ip))
    }

    /// Returns a consistent copy of the whole blocklist in insertion order.
    /// Reads are cheap and never wait on the request deadline.
    pub async fn list(&self) -> Result<BlocklistSnapshot> {
        self.store.snapshot().await
    }

    pub async fn len(&self) -> Result<usize> {
        self.store.len().await
    }
}

fn parse(input: &str) -> Result<IpAddress> {
    IpAddress::parse(input).inspect_err(|e| warn!("Rejected blocklist input: {e}"))
}
