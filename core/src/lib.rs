//! Typed client for the portfolio site's REST backend.
//!
//! # Overview
//! `HttpClient` turns a relative path, method and optional JSON body into an
//! `HttpRequest`, hands it to a `Transport`, and classifies the response as
//! JSON, text or empty, failing with `HttpError` outside the 2xx range. The
//! resource services (`auth`, `user`, `education`, `experience`, `project`)
//! map each backend operation to one call against a fixed route.
//!
//! # Design
//! - `HttpClient` is stateless apart from its base URL and transport.
//! - Request building and response parsing are pure; only the transport
//!   touches the network, so tests swap in `RecordingTransport`.
//! - Partial updates use explicit change sets (`Option` / `Patch`), and an
//!   empty change set never reaches the network.
//! - Configuration is read once from the environment (`get_env`).

pub mod api_client;
pub mod client;
pub mod env;
pub mod error;
pub mod http;
pub mod patch;
pub mod routes;
pub mod services;
pub mod transport;
pub mod types;

pub use api_client::api_client;
pub use client::HttpClient;
pub use env::{get_env, Env, NodeEnv};
pub use error::{ApiError, ConfigError, HttpError};
pub use http::{Credentials, HttpMethod, HttpRequest, HttpResponse, RequestOptions, ResponseBody};
pub use patch::{DateInput, Patch, UpdateOutcome};
pub use services::{
    AuthService, CreateEducationRequest, CreateExperienceRequest, CreateProjectRequest,
    EducationService, ExperienceService, LoginRequest, PortfolioApi, ProjectService, Session,
    UpdateEducationRequest, UpdateExperienceRequest, UpdateProjectRequest, UserService,
};
pub use transport::{RecordingTransport, Transport, UreqTransport};
pub use types::{ApiResponse, Education, Experience, HttpStatusCode, Project, User};
