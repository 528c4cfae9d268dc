//! Dashboard summary across all of the user's projects.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::debug;

use crate::models::{Project, Task, TaskStatus};

use super::Resources;

/// Maximum number of task lists fetched at once
const MAX_CONCURRENT: usize = 5;

/// How many recently updated projects the dashboard shows
const RECENT_PROJECTS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl StatusCounts {
    fn add(&mut self, status: TaskStatus) {
        match status {
            TaskStatus::Todo => self.todo += 1,
            TaskStatus::InProgress => self.in_progress += 1,
            TaskStatus::Done => self.done += 1,
        }
    }

    pub fn get(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Todo => self.todo,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Done => self.done,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_projects: usize,
    pub total_tasks: usize,
    pub by_status: StatusCounts,
    pub overdue: usize,
    /// Share of tasks done, 0-100, rounded down. Zero when there are no tasks.
    pub completion_percent: u8,
    /// Most recently updated first
    pub recent_projects: Vec<Project>,
}

impl DashboardSummary {
    pub fn build(projects: &[Project], tasks: &[Task], today: NaiveDate) -> Self {
        let mut by_status = StatusCounts::default();
        let mut overdue = 0;
        for task in tasks {
            by_status.add(task.status);
            if task.is_overdue(today) {
                overdue += 1;
            }
        }

        let completion_percent = if tasks.is_empty() {
            0
        } else {
            (by_status.done * 100 / tasks.len()) as u8
        };

        let mut recent_projects = projects.to_vec();
        recent_projects.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        recent_projects.truncate(RECENT_PROJECTS);

        Self {
            total_projects: projects.len(),
            total_tasks: tasks.len(),
            by_status,
            overdue,
            completion_percent,
            recent_projects,
        }
    }
}

impl Resources {
    /// Summarize every project and its tasks. Task lists are fetched a few
    /// at a time; the first failure aborts the summary.
    pub async fn dashboard(&self, force: bool) -> Result<DashboardSummary> {
        let projects = self.projects.list(force).await?.data;

        let mut tasks = Vec::new();
        for chunk in projects.chunks(MAX_CONCURRENT) {
            let futures: Vec<_> = chunk
                .iter()
                .map(|project| self.tasks.list(project.id, force))
                .collect();

            for result in join_all(futures).await {
                tasks.extend(result?.data);
            }
        }
        debug!(projects = projects.len(), tasks = tasks.len(), "Dashboard data loaded");

        Ok(DashboardSummary::build(
            &projects,
            &tasks,
            Utc::now().date_naive(),
        ))
    }
}
