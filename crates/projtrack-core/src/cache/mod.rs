//! Local cache of server data.
//!
//! The `CacheManager` stores projects, per-project task lists and the
//! signed-in user as JSON files. Entries are considered stale after
//! 5 minutes, after which the resource stores go back to the network.

pub mod manager;

pub use manager::{CacheAges, CacheManager, CachedData};
