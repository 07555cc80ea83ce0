//! Error types for the portfolio API client.
//!
//! # Design
//! Three failure sources are kept apart: configuration (`ConfigError`,
//! fatal at startup), non-2xx responses (`HttpError`, carrying everything
//! the caller needs to interpret the server's answer) and local
//! preconditions such as unparsable dates, which fail before any request
//! is sent. `ApiError` is the single type every public operation returns.

use thiserror::Error;

use crate::http::{HttpMethod, ResponseBody};

/// Invalid or missing process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing {0} env var")]
    MissingBaseUrl(&'static str),

    #[error("invalid {var}: expected absolute URL, got: {value}")]
    InvalidBaseUrl { var: &'static str, value: String },

    #[error("invalid {var}: expected development, test or production, got: {value}")]
    InvalidNodeEnv { var: &'static str, value: String },
}

/// A response outside the 2xx range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HttpError {
    pub message: String,
    pub status: u16,
    pub method: HttpMethod,
    pub url: String,
    /// Parsed response body, kept so callers can read server-provided errors.
    pub body: ResponseBody,
}

impl HttpError {
    pub fn new(status: u16, method: HttpMethod, url: impl Into<String>, body: ResponseBody) -> Self {
        let url = url.into();
        Self {
            message: format!("HTTP {status} for {method} {url}"),
            status,
            method,
            url,
            body,
        }
    }

    /// The `message` field of a JSON error body, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        self.body.as_json()?.get("message")?.as_str()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Errors returned by `HttpClient` and the resource services.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Http(#[from] HttpError),

    /// The transport could not complete the exchange (DNS, connect, I/O).
    #[error("transport failed for {url}: {message}")]
    Transport { url: String, message: String },

    /// A date field could not be coerced to a UTC timestamp.
    #[error("invalid date for {field}: {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// A 2xx response whose body was not JSON where JSON was expected.
    #[error("expected a JSON body from {url}, got {body:?}")]
    UnexpectedBody { url: String, body: ResponseBody },

    /// An envelope reported failure, or carried no data, where data was required.
    #[error("request was not successful ({status_code}): {message}")]
    Unsuccessful { status_code: u16, message: String },
}

impl ApiError {
    /// The HTTP status, if the error came from a server response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http(err) => Some(err.status),
            _ => None,
        }
    }

    pub fn as_http(&self) -> Option<&HttpError> {
        match self {
            ApiError::Http(err) => Some(err),
            _ => None,
        }
    }
}
