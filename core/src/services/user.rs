use crate::client::HttpClient;
use crate::error::ApiError;
use crate::http::RequestOptions;
use crate::routes;
use crate::transport::Transport;
use crate::types::{ApiResponse, User};

pub struct UserService<'a, T> {
    client: &'a HttpClient<T>,
}

impl<'a, T: Transport> UserService<'a, T> {
    pub fn new(client: &'a HttpClient<T>) -> Self {
        Self { client }
    }

    /// The administrator the session cookie belongs to.
    pub fn get_current_user(&self) -> Result<ApiResponse<User>, ApiError> {
        self.client
            .get(routes::user::ME, &RequestOptions::credentialed())
    }
}
