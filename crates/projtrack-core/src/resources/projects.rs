use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::api::ApiClient;
use crate::cache::CacheManager;
use crate::models::{Project, ProjectInput};

use super::{fresh, log_cache_error, remove_by_id, replace_by_id, Fetched};

#[derive(Clone)]
pub struct ProjectStore {
    api: ApiClient,
    cache: Arc<CacheManager>,
}

impl ProjectStore {
    pub fn new(api: ApiClient, cache: Arc<CacheManager>) -> Self {
        Self { api, cache }
    }

    /// Projects of the signed-in user. `force` skips the cache.
    pub async fn list(&self, force: bool) -> Result<Fetched<Vec<Project>>> {
        if !force {
            if let Some(hit) = fresh("projects", || self.cache.load_projects()) {
                return Ok(hit);
            }
        }

        let projects = self.api.list_projects().await?;
        log_cache_error("projects", self.cache.save_projects(&projects));
        Ok(Fetched::network(projects))
    }

    pub async fn create(&self, input: &ProjectInput) -> Result<Project> {
        let project = self.api.create_project(input).await?;
        info!(project_id = project.id, "Project created");
        log_cache_error(
            "projects",
            self.cache.update_projects(|list| list.push(project.clone())),
        );
        Ok(project)
    }

    pub async fn update(&self, id: i64, input: &ProjectInput) -> Result<Project> {
        let project = self.api.update_project(id, input).await?;
        log_cache_error(
            "projects",
            self.cache
                .update_projects(|list| replace_by_id(list, project.clone())),
        );
        Ok(project)
    }

    /// Delete a project; its cached task list goes with it.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete_project(id).await?;
        info!(project_id = id, "Project deleted");
        log_cache_error(
            "projects",
            self.cache.update_projects(|list| remove_by_id(list, id)),
        );
        log_cache_error("tasks", self.cache.invalidate_tasks(id));
        Ok(())
    }

    /// Find one project, preferring the cached list
    pub async fn get(&self, id: i64) -> Result<Option<Project>> {
        let projects = self.list(false).await?;
        Ok(projects.data.into_iter().find(|p| p.id == id))
    }
}
