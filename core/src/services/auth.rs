//! Admin sign-in and sign-out.

use serde::Serialize;

use crate::client::HttpClient;
use crate::error::ApiError;
use crate::http::RequestOptions;
use crate::routes;
use crate::services::user::UserService;
use crate::transport::Transport;
use crate::types::{ApiResponse, User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Whether the transport currently holds a valid admin session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    Authenticated(User),
    Anonymous,
}

pub struct AuthService<'a, T> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> AuthService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    /// On success the backend sets the session cookie; wrong credentials
    /// come back as an `HttpError` with status 401.
    #[tracing::instrument(skip(self, request), fields(email = %request.email))]
    pub fn login(&self, request: &LoginRequest) -> Result<ApiResponse<()>, ApiError> {
        let response = self.client.post(
            routes::auth::LOGIN,
            Some(request),
            &RequestOptions::credentialed(),
        )?;
        tracing::info!("logged in");
        Ok(response)
    }

    /// `None` when the backend answers with an empty 2xx body.
    pub fn logout(&self) -> Result<Option<ApiResponse<()>>, ApiError> {
        self.client
            .delete(routes::auth::LOGOUT, &RequestOptions::credentialed())
    }

    /// Resolve the current session. 401 and 403 mean "not signed in";
    /// every other failure is returned as is.
    pub fn session(&self) -> Result<Session, ApiError> {
        match UserService::new(self.client).get_current_user() {
            Ok(response) => response.into_data().map(Session::Authenticated),
            Err(ApiError::Http(err)) if matches!(err.status, 401 | 403) => {
                tracing::debug!(status = err.status, "no active session");
                Ok(Session::Anonymous)
            }
            Err(err) => Err(err),
        }
    }
}
