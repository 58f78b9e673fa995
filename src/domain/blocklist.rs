//! IP blocklist domain: validated addresses, the store seam and the service
//! that callers use to mutate and query the blocklist.

pub mod address;
pub mod context;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

pub use address::IpAddress;
pub use context::RequestContext;
pub use error::{BlocklistError, ErrorKind};
pub use models::{BlocklistEntry, BlocklistSnapshot, Insertion};
pub use service::BlocklistService;
pub use store::{BlocklistStore, DEFAULT_MAX_ENTRIES, MemoryStore};
