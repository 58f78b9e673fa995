pub mod blocklist;
pub mod health;
