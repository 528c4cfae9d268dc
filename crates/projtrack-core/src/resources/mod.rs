//! Resource stores: cached access to the backend's projects, tasks and
//! current user.
//!
//! Each store fetches through the [`ApiClient`] and keeps the result in the
//! [`CacheManager`]. Fresh cache entries are served without a request;
//! mutations patch the cached lists with what the server returned instead
//! of refetching.

pub mod account;
pub mod dashboard;
pub mod projects;
pub mod tasks;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::cache::{CacheManager, CachedData};
use crate::models::{Project, Task};

pub use account::AccountStore;
pub use dashboard::{DashboardSummary, StatusCounts};
pub use projects::ProjectStore;
pub use tasks::TaskStore;

/// Data plus where it came from
#[derive(Debug, Clone)]
pub struct Fetched<T> {
    pub data: T,
    /// Age of the cache entry when served from cache, `None` when fresh
    /// from the server
    pub cached: Option<String>,
}

impl<T> Fetched<T> {
    pub fn network(data: T) -> Self {
        Self { data, cached: None }
    }

    fn from_cache(cached: CachedData<T>) -> Self {
        Self {
            cached: Some(cached.age_display()),
            data: cached.data,
        }
    }

    pub fn is_cached(&self) -> bool {
        self.cached.is_some()
    }
}

/// Fresh cache entry from `loader`, if any. Read errors count as a miss.
fn fresh<T>(
    name: &str,
    loader: impl FnOnce() -> anyhow::Result<Option<CachedData<T>>>,
) -> Option<Fetched<T>> {
    match loader() {
        Ok(Some(cached)) if !cached.is_stale() => {
            debug!(cache = name, age = %cached.age_display(), "Serving from cache");
            Some(Fetched::from_cache(cached))
        }
        Ok(_) => None,
        Err(e) => {
            debug!(cache = name, error = %e, "Ignoring unreadable cache");
            None
        }
    }
}

/// Log cache write failures; a failed cache write never fails the operation
fn log_cache_error<T>(name: &str, result: anyhow::Result<T>) {
    if let Err(e) = result {
        warn!(cache = name, error = %e, "Failed to update cache");
    }
}

/// Entities addressed by a numeric id
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for Project {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Task {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Swap in `item` where an entry with the same id sits; unknown ids are ignored
pub fn replace_by_id<T: Identified>(list: &mut [T], item: T) {
    if let Some(slot) = list.iter_mut().find(|entry| entry.id() == item.id()) {
        *slot = item;
    }
}

pub fn remove_by_id<T: Identified>(list: &mut Vec<T>, id: i64) {
    list.retain(|entry| entry.id() != id);
}

/// All stores over one client and cache
#[derive(Clone)]
pub struct Resources {
    pub account: AccountStore,
    pub projects: ProjectStore,
    pub tasks: TaskStore,
}

impl Resources {
    pub fn new(api: ApiClient, cache: Arc<CacheManager>) -> Self {
        Self {
            account: AccountStore::new(api.clone(), cache.clone()),
            projects: ProjectStore::new(api.clone(), cache.clone()),
            tasks: TaskStore::new(api, cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(i64, &'static str);

    impl Identified for Item {
        fn id(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_replace_by_id() {
        let mut list = vec![Item(1, "a"), Item(2, "b")];
        replace_by_id(&mut list, Item(2, "B"));
        assert_eq!(list, vec![Item(1, "a"), Item(2, "B")]);

        replace_by_id(&mut list, Item(3, "c"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_by_id() {
        let mut list = vec![Item(1, "a"), Item(2, "b")];
        remove_by_id(&mut list, 1);
        assert_eq!(list, vec![Item(2, "b")]);
        remove_by_id(&mut list, 42);
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_fresh_skips_stale_and_errors() {
        let mut stale = CachedData::new(vec![1]);
        stale.cached_at = chrono::Utc::now() - chrono::Duration::minutes(10);
        assert!(fresh("x", || Ok(Some(stale))).is_none());

        assert!(fresh::<Vec<i32>>("x", || Err(anyhow::anyhow!("corrupt"))).is_none());
        assert!(fresh::<Vec<i32>>("x", || Ok(None)).is_none());

        let hit = fresh("x", || Ok(Some(CachedData::new(vec![1])))).unwrap();
        assert!(hit.is_cached());
        assert_eq!(hit.data, vec![1]);
    }
}
