use crate::models::{Task, TaskInput};

use super::error::ApiError;
use super::refresh::ApiClient;

fn tasks_path(project_id: i64) -> String {
    format!("/v1/projects/{}/tasks/", project_id)
}

fn task_path(project_id: i64, id: i64) -> String {
    format!("/v1/projects/{}/tasks/{}/", project_id, id)
}

impl ApiClient {
    pub async fn list_tasks(&self, project_id: i64) -> Result<Vec<Task>, ApiError> {
        self.get(&tasks_path(project_id)).await
    }

    /// `input.project` is overwritten with `project_id` so path and body agree.
    pub async fn create_task(&self, project_id: i64, input: &TaskInput) -> Result<Task, ApiError> {
        let body = TaskInput {
            project: project_id,
            ..input.clone()
        };
        self.post(&tasks_path(project_id), &body).await
    }

    pub async fn update_task(
        &self,
        project_id: i64,
        id: i64,
        input: &TaskInput,
    ) -> Result<Task, ApiError> {
        let body = TaskInput {
            project: project_id,
            ..input.clone()
        };
        self.put(&task_path(project_id, id), &body).await
    }

    pub async fn delete_task(&self, project_id: i64, id: i64) -> Result<(), ApiError> {
        self.delete(&task_path(project_id, id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_paths() {
        assert_eq!(tasks_path(3), "/v1/projects/3/tasks/");
        assert_eq!(task_path(3, 9), "/v1/projects/3/tasks/9/");
    }
}
