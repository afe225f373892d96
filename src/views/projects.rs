//! Projects list page with its create form.

use crate::errors::ClientError;
use crate::models::{CreateProjectRequest, Project};
use crate::query::keys;
use crate::App;

use super::{text_table, ViewState};

pub const NO_PROJECTS_TEXT: &str = "No projects yet. Create your first project to get started!";

pub async fn projects(app: &App) -> Result<Vec<Project>, ClientError> {
    app.queries
        .fetch_query(keys::projects(), || async move {
            app.client.projects().list().await
        })
        .await
}

/// State of the "Create New Project" modal.
#[derive(Debug, Clone, Default)]
pub struct CreateProjectForm {
    pub open: bool,
    pub name: String,
    pub domain: String,
    pub error: Option<String>,
    pub submitting: bool,
}

impl CreateProjectForm {
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.name.trim().is_empty() && !self.domain.trim().is_empty()
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Default)]
pub struct ProjectsPage {
    pub projects: ViewState<Vec<Project>>,
    pub form: CreateProjectForm,
}

impl ProjectsPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&mut self, app: &App) {
        self.projects =
            ViewState::from_result(projects(app).await, NO_PROJECTS_TEXT, |p| p.is_empty());
    }

    pub fn open_create(&mut self) {
        self.form.open = true;
    }

    pub fn close_create(&mut self) {
        self.form.open = false;
    }

    /// Create the project from the form. On success the list is
    /// invalidated and reloaded, and the form closes and clears.
    pub async fn submit_create(&mut self, app: &App) -> Result<Project, ClientError> {
        if !self.form.can_submit() {
            let err = ClientError::Validation("Project name and domain are required".to_string());
            self.form.error = Some(err.message());
            return Err(err);
        }

        let request = CreateProjectRequest {
            name: self.form.name.trim().to_string(),
            domain: self.form.domain.trim().to_string(),
        };

        self.form.submitting = true;
        self.form.error = None;
        let result = app
            .queries
            .mutate(app.client.projects().create(&request), &[keys::projects()])
            .await;
        self.form.submitting = false;

        match result {
            Ok(project) => {
                tracing::info!("Created project {} ({})", project.name, project.domain);
                self.form.reset();
                self.load(app).await;
                Ok(project)
            }
            Err(e) => {
                self.form.error = Some(e.message());
                Err(e)
            }
        }
    }

    pub fn render(&self) -> String {
        let body = self.projects.render_with(|projects| {
            let rows: Vec<Vec<String>> = projects
                .iter()
                .map(|p| {
                    vec![
                        p.id.clone(),
                        p.name.clone(),
                        p.domain.clone(),
                        gsc_badge(p).to_string(),
                    ]
                })
                .collect();
            text_table(&["ID", "Name", "Domain", "Search Console"], &rows)
        });

        let mut out = format!("Projects\n\n{}", body);
        if let Some(error) = &self.form.error {
            out.push_str(&format!("\n\nError: {}", error));
        }
        out
    }
}

pub fn gsc_badge(project: &Project) -> &'static str {
    if project.gsc_connected {
        "GSC Connected"
    } else {
        "Not Connected"
    }
}

pub async fn delete_project(app: &App, project_id: &str) -> Result<(), ClientError> {
    app.queries
        .mutate(
            app.client.projects().delete(project_id),
            &[keys::projects(), keys::project(project_id)],
        )
        .await
}
