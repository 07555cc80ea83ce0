//! Resource services: one method per backend operation.
//!
//! Services borrow an `HttpClient` and add nothing but routes, payload
//! shapes and credential policy. `PortfolioApi` owns a client and hands out
//! all of them.

pub mod auth;
pub mod education;
pub mod experience;
pub mod project;
pub mod user;

use crate::client::HttpClient;
use crate::transport::{Transport, UreqTransport};

pub use auth::{AuthService, LoginRequest, Session};
pub use education::{CreateEducationRequest, EducationPatchBody, EducationService, UpdateEducationRequest};
pub use experience::{
    CreateExperienceRequest, ExperiencePatchBody, ExperienceService, UpdateExperienceRequest,
};
pub use project::{CreateProjectRequest, ProjectService, UpdateProjectRequest};
pub use user::UserService;

/// Entry point bundling one client with every service.
#[derive(Debug, Clone)]
pub struct PortfolioApi<T = UreqTransport> {
    client: HttpClient<T>,
}

impl<T: Transport> PortfolioApi<T> {
    pub fn new(client: HttpClient<T>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &HttpClient<T> {
        &self.client
    }

    pub fn auth(&self) -> AuthService<'_, T> {
        AuthService::new(&self.client)
    }

    pub fn user(&self) -> UserService<'_, T> {
        UserService::new(&self.client)
    }

    pub fn education(&self) -> EducationService<'_, T> {
        EducationService::new(&self.client)
    }

    pub fn experience(&self) -> ExperienceService<'_, T> {
        ExperienceService::new(&self.client)
    }

    pub fn project(&self) -> ProjectService<'_, T> {
        ProjectService::new(&self.client)
    }
}
