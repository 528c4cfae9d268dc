use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::models::{Project, Task, User};

/// Consider cache stale after 5 minutes, matching how long the web client
/// trusts its query cache.
const CACHE_STALE_MINUTES: i64 = 5;

const PROJECTS: &str = "projects";
const ME: &str = "me";
const TASKS_PREFIX: &str = "tasks_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
}

impl<T> CachedData<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            cached_at: Utc::now(),
        }
    }

    pub fn age(&self) -> Duration {
        Utc::now() - self.cached_at
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age().num_minutes();
        if minutes < 1 {
            // Also covers clock skew
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            format!("{}h ago", minutes / 60)
        } else {
            format!("{}d ago", minutes / 1440)
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age() >= Duration::minutes(CACHE_STALE_MINUTES)
    }
}

pub struct CacheManager {
    cache_dir: PathBuf,
}

impl CacheManager {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn cache_path(&self, name: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", name))
    }

    fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Option<CachedData<T>>> {
        let path = self.cache_path(name);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file: {}", name))?;

        let cached: CachedData<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file: {}", name))?;

        Ok(Some(cached))
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        self.write(name, &CachedData::new(data))
    }

    fn write<T: Serialize>(&self, name: &str, cached: &CachedData<T>) -> Result<()> {
        let contents = serde_json::to_string_pretty(cached)?;
        std::fs::write(self.cache_path(name), contents)
            .with_context(|| format!("Failed to write cache file: {}", name))?;
        debug!(cache = name, "Cache written");
        Ok(())
    }

    /// Edit a cached list in place, keeping its timestamp. Nothing is
    /// written when the list was never cached.
    fn update<T, F>(&self, name: &str, edit: F) -> Result<bool>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>),
    {
        let Some(mut cached) = self.load::<Vec<T>>(name)? else {
            return Ok(false);
        };
        edit(&mut cached.data);
        self.write(name, &cached)?;
        Ok(true)
    }

    fn remove(&self, name: &str) -> Result<()> {
        let path = self.cache_path(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove cache file: {}", name))?;
            debug!(cache = name, "Cache invalidated");
        }
        Ok(())
    }

    // ===== Projects =====

    pub fn load_projects(&self) -> Result<Option<CachedData<Vec<Project>>>> {
        self.load(PROJECTS)
    }

    pub fn save_projects(&self, projects: &[Project]) -> Result<()> {
        self.save(PROJECTS, &projects)
    }

    pub fn update_projects(&self, edit: impl FnOnce(&mut Vec<Project>)) -> Result<bool> {
        self.update(PROJECTS, edit)
    }

    // ===== Tasks =====

    fn tasks_name(project_id: i64) -> String {
        format!("{}{}", TASKS_PREFIX, project_id)
    }

    pub fn load_tasks(&self, project_id: i64) -> Result<Option<CachedData<Vec<Task>>>> {
        self.load(&Self::tasks_name(project_id))
    }

    pub fn save_tasks(&self, project_id: i64, tasks: &[Task]) -> Result<()> {
        self.save(&Self::tasks_name(project_id), &tasks)
    }

    pub fn update_tasks(&self, project_id: i64, edit: impl FnOnce(&mut Vec<Task>)) -> Result<bool> {
        self.update(&Self::tasks_name(project_id), edit)
    }

    pub fn invalidate_tasks(&self, project_id: i64) -> Result<()> {
        self.remove(&Self::tasks_name(project_id))
    }

    // ===== Current user =====

    pub fn load_me(&self) -> Result<Option<CachedData<User>>> {
        self.load(ME)
    }

    pub fn save_me(&self, user: &User) -> Result<()> {
        self.save(ME, user)
    }

    pub fn invalidate_me(&self) -> Result<()> {
        self.remove(ME)
    }

    /// Remove every cache file
    pub fn clear(&self) -> Result<()> {
        let entries = std::fs::read_dir(&self.cache_dir)
            .with_context(|| format!("Failed to read cache directory: {}", self.cache_dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                std::fs::remove_file(&path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
        }
        debug!("Cache cleared");
        Ok(())
    }

    // ===== Cache Age Information =====

    /// Helper to load cache and log errors without failing
    fn load_age<T>(&self, name: &str, loader: impl FnOnce() -> Result<Option<CachedData<T>>>) -> Option<String> {
        match loader() {
            Ok(Some(cached)) => Some(cached.age_display()),
            Ok(None) => None,
            Err(e) => {
                debug!(cache = name, error = %e, "Failed to load cache for age display");
                None
            }
        }
    }

    pub fn get_cache_ages(&self) -> CacheAges {
        CacheAges {
            projects: self.load_age(PROJECTS, || self.load_projects()),
            me: self.load_age(ME, || self.load_me()),
        }
    }
}

#[derive(Debug, Default)]
pub struct CacheAges {
    pub projects: Option<String>,
    pub me: Option<String>,
}

impl CacheAges {
    pub fn projects_age(&self) -> String {
        self.projects.clone().unwrap_or_else(|| "never".to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
