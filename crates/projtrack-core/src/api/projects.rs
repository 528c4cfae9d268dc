use crate::models::{Project, ProjectInput};

use super::error::ApiError;
use super::refresh::ApiClient;

const PROJECTS_PATH: &str = "/v1/projects/";

fn project_path(id: i64) -> String {
    format!("{}{}/", PROJECTS_PATH, id)
}

impl ApiClient {
    pub async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get(PROJECTS_PATH).await
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<Project, ApiError> {
        self.post(PROJECTS_PATH, input).await
    }

    pub async fn update_project(&self, id: i64, input: &ProjectInput) -> Result<Project, ApiError> {
        self.put(&project_path(id), input).await
    }

    pub async fn delete_project(&self, id: i64) -> Result<(), ApiError> {
        self.delete(&project_path(id)).await
    }
}
