//! Portfolio projects.

use serde::Serialize;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::http::RequestOptions;
use crate::patch::{keep_if_changed, Patch, UpdateOutcome};
use crate::routes;
use crate::transport::Transport;
use crate::types::{ApiResponse, Project};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub github_url: Option<String>,
    pub website_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateProjectBody<'a> {
    name: &'a str,
    description: &'a str,
    skills: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    github_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    website_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<&'a str>,
}

/// Fields to change on a project. `Patch::Clear` removes a link.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub github_url: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub website_url: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_unchanged")]
    pub image_url: Patch<String>,
}

impl UpdateProjectRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Drop every field whose value already matches `baseline`.
    pub fn without_unchanged(self, baseline: &Project) -> Self {
        let same = |new: &String, old: &String| new == old;
        Self {
            name: keep_if_changed(self.name, &baseline.name),
            description: keep_if_changed(self.description, &baseline.description),
            skills: keep_if_changed(self.skills, &baseline.skills),
            github_url: self.github_url.unless_equal(baseline.github_url.as_ref(), same),
            website_url: self.website_url.unless_equal(baseline.website_url.as_ref(), same),
            image_url: self.image_url.unless_equal(baseline.image_url.as_ref(), same),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub struct ProjectService<'a, T> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> ProjectService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    pub fn get_all_projects(&self) -> Result<ApiResponse<Vec<Project>>, ApiError> {
        self.client
            .get(routes::project::GET_ALL, &RequestOptions::default())
    }

    /// Empty link fields are left out of the body.
    pub fn create_project(
        &self,
        payload: &CreateProjectRequest,
    ) -> Result<ApiResponse<Project>, ApiError> {
        let body = CreateProjectBody {
            name: &payload.name,
            description: &payload.description,
            skills: &payload.skills,
            github_url: non_empty(&payload.github_url),
            website_url: non_empty(&payload.website_url),
            image_url: non_empty(&payload.image_url),
        };
        self.client.post(
            routes::project::CREATE,
            Some(&body),
            &RequestOptions::credentialed(),
        )
    }

    pub fn update_project(
        &self,
        id: &str,
        changes: UpdateProjectRequest,
    ) -> Result<UpdateOutcome<Project>, ApiError> {
        if changes.is_empty() {
            tracing::info!(id, "no project changes to save");
            return Ok(UpdateOutcome::NoChanges);
        }
        self.client
            .patch(
                &routes::project::update(id),
                Some(&changes),
                &RequestOptions::credentialed(),
            )
            .map(UpdateOutcome::Updated)
    }

    pub fn update_project_from(
        &self,
        baseline: &Project,
        changes: UpdateProjectRequest,
    ) -> Result<UpdateOutcome<Project>, ApiError> {
        self.update_project(&baseline.id, changes.without_unchanged(baseline))
    }

    pub fn delete_project(&self, id: &str) -> Result<Option<ApiResponse<()>>, ApiError> {
        self.client
            .delete(&routes::project::delete(id), &RequestOptions::credentialed())
    }
}
