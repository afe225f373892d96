//! Project endpoints.

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{CreateProjectRequest, Project, UpdateProjectRequest};

pub struct ProjectsApi<'a> {
    client: &'a ApiClient,
}

impl ApiClient {
    pub fn projects(&self) -> ProjectsApi<'_> {
        ProjectsApi { client: self }
    }
}

impl ProjectsApi<'_> {
    /// GET /api/projects - List the user's projects.
    pub async fn list(&self) -> Result<Vec<Project>, ClientError> {
        self.client.get_json("/api/projects").await
    }

    /// GET /api/projects/:id - Get a single project.
    pub async fn get(&self, id: &str) -> Result<Project, ClientError> {
        self.client.get_json(&format!("/api/projects/{}", id)).await
    }

    /// POST /api/projects - Create a project.
    pub async fn create(&self, request: &CreateProjectRequest) -> Result<Project, ClientError> {
        self.client.post_json("/api/projects", request).await
    }

    /// PUT /api/projects/:id - Update name, domain or GSC flag.
    pub async fn update(
        &self,
        id: &str,
        request: &UpdateProjectRequest,
    ) -> Result<Project, ClientError> {
        self.client
            .put_json(&format!("/api/projects/{}", id), request)
            .await
    }

    /// DELETE /api/projects/:id - Delete a project.
    pub async fn delete(&self, id: &str) -> Result<(), ClientError> {
        self.client.delete(&format!("/api/projects/{}", id)).await
    }
}
