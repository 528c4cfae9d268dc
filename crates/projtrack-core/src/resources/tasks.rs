use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::api::ApiClient;
use crate::cache::CacheManager;
use crate::models::{Task, TaskInput};

use super::{fresh, log_cache_error, remove_by_id, replace_by_id, Fetched};

#[derive(Clone)]
pub struct TaskStore {
    api: ApiClient,
    cache: Arc<CacheManager>,
}

impl TaskStore {
    pub fn new(api: ApiClient, cache: Arc<CacheManager>) -> Self {
        Self { api, cache }
    }

    /// Tasks of one project. No project (id 0) means no query at all.
    pub async fn list(&self, project_id: i64, force: bool) -> Result<Fetched<Vec<Task>>> {
        if project_id == 0 {
            debug!("No project selected, skipping task query");
            return Ok(Fetched::network(Vec::new()));
        }
        if !force {
            if let Some(hit) = fresh("tasks", || self.cache.load_tasks(project_id)) {
                return Ok(hit);
            }
        }

        let tasks = self.api.list_tasks(project_id).await?;
        log_cache_error("tasks", self.cache.save_tasks(project_id, &tasks));
        Ok(Fetched::network(tasks))
    }

    pub async fn create(&self, project_id: i64, input: &TaskInput) -> Result<Task> {
        let task = self.api.create_task(project_id, input).await?;
        info!(project_id, task_id = task.id, "Task created");
        log_cache_error(
            "tasks",
            self.cache
                .update_tasks(project_id, |list| list.push(task.clone())),
        );
        Ok(task)
    }

    pub async fn update(&self, project_id: i64, id: i64, input: &TaskInput) -> Result<Task> {
        let task = self.api.update_task(project_id, id, input).await?;
        log_cache_error(
            "tasks",
            self.cache
                .update_tasks(project_id, |list| replace_by_id(list, task.clone())),
        );
        Ok(task)
    }

    pub async fn delete(&self, project_id: i64, id: i64) -> Result<()> {
        self.api.delete_task(project_id, id).await?;
        info!(project_id, task_id = id, "Task deleted");
        log_cache_error(
            "tasks",
            self.cache
                .update_tasks(project_id, |list| remove_by_id(list, id)),
        );
        Ok(())
    }

    /// Find one task, preferring the cached list
    pub async fn get(&self, project_id: i64, id: i64) -> Result<Option<Task>> {
        let tasks = self.list(project_id, false).await?;
        Ok(tasks.data.into_iter().find(|t| t.id == id))
    }
}
