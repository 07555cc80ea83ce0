//! Wire types for the portfolio API.
//!
//! # Design
//! Records mirror the backend's JSON (camelCase, string ids, ISO-8601
//! timestamps as strings). They are request-scoped copies; the backend owns
//! the data. Request payloads live next to their service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Status codes the backend places in the envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum HttpStatusCode {
    Ok,
    Created,
    Accepted,
    NoContent,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    InternalServerError,
}

impl HttpStatusCode {
    pub fn as_u16(self) -> u16 {
        match self {
            HttpStatusCode::Ok => 200,
            HttpStatusCode::Created => 201,
            HttpStatusCode::Accepted => 202,
            HttpStatusCode::NoContent => 204,
            HttpStatusCode::BadRequest => 400,
            HttpStatusCode::Unauthorized => 401,
            HttpStatusCode::Forbidden => 403,
            HttpStatusCode::NotFound => 404,
            HttpStatusCode::MethodNotAllowed => 405,
            HttpStatusCode::InternalServerError => 500,
        }
    }

    pub fn is_success(self) -> bool {
        (200..=299).contains(&self.as_u16())
    }
}

impl TryFrom<u16> for HttpStatusCode {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Ok(match code {
            200 => HttpStatusCode::Ok,
            201 => HttpStatusCode::Created,
            202 => HttpStatusCode::Accepted,
            204 => HttpStatusCode::NoContent,
            400 => HttpStatusCode::BadRequest,
            401 => HttpStatusCode::Unauthorized,
            403 => HttpStatusCode::Forbidden,
            404 => HttpStatusCode::NotFound,
            405 => HttpStatusCode::MethodNotAllowed,
            500 => HttpStatusCode::InternalServerError,
            other => return Err(format!("unsupported status code {other}")),
        })
    }
}

impl From<HttpStatusCode> for u16 {
    fn from(code: HttpStatusCode) -> Self {
        code.as_u16()
    }
}

impl fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Envelope around every data-bearing backend response.
///
/// `success` is true exactly when `status_code` is 2xx. `data` is absent or
/// null on failures and on endpoints that return no payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status_code: HttpStatusCode,
    pub message: String,
    pub data: Option<T>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// Whether `success` agrees with the status code.
    pub fn is_consistent(&self) -> bool {
        self.success == self.status_code.is_success()
    }

    /// The payload of a successful envelope.
    pub fn into_data(self) -> Result<T, ApiError> {
        match self.data {
            Some(data) if self.success => Ok(data),
            _ => Err(ApiError::Unsuccessful {
                status_code: self.status_code.as_u16(),
                message: self.message,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: String,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub id: String,
    pub company: String,
    pub position: String,
    #[serde(default)]
    pub bullet_points: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub start_date: String,
    /// `None` for a current position.
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// The signed-in administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}
