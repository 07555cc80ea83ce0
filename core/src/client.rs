//! HTTP client for the portfolio REST backend.
//!
//! # Design
//! `HttpClient` holds only a base URL and a transport and carries no mutable
//! state between calls. Every call is split into `build_request`, which
//! produces an `HttpRequest`, and `parse_response`, which classifies an
//! `HttpResponse`; `request` glues the two around one `Transport::execute`.
//! Both halves are pure, so the request/response contract can be checked
//! without a network.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::env::get_env;
use crate::error::{ApiError, HttpError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions, ResponseBody};
use crate::transport::{Transport, UreqTransport};

const CONTENT_TYPE: &str = "Content-Type";
const APPLICATION_JSON: &str = "application/json";

/// Client that resolves paths against a base URL and exchanges JSON.
#[derive(Debug, Clone)]
pub struct HttpClient<T = UreqTransport> {
    base_url: String,
    transport: T,
}

impl HttpClient<UreqTransport> {
    /// Client for the configured base URL over the default transport.
    pub fn from_env() -> Result<Self, ApiError> {
        let env = get_env()?;
        Ok(Self::new(&env.api_base_url, UreqTransport::new()))
    }
}

impl<T: Transport> HttpClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve `path` against the base URL.
    ///
    /// Absolute `http(s)` URLs pass through unchanged. Otherwise base and
    /// path are joined with exactly one `/`.
    pub fn compose_url(&self, path: &str) -> String {
        if is_absolute_http(path) {
            return path.to_string();
        }
        let base = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        let path = path.strip_prefix('/').unwrap_or(path);
        format!("{base}/{path}")
    }

    /// Build the request for one call without sending it.
    pub fn build_request<B: Serialize + ?Sized>(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())];
        for (name, value) in &options.headers {
            match headers.iter_mut().find(|(key, _)| key.eq_ignore_ascii_case(name)) {
                Some(existing) => existing.1 = value.clone(),
                None => headers.push((name.clone(), value.clone())),
            }
        }

        let body = body
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;

        Ok(HttpRequest {
            method,
            url: self.compose_url(path),
            headers,
            body,
            credentials: options.credentials,
        })
    }

    /// Classify a response body and map non-2xx statuses to `HttpError`.
    pub fn parse_response(
        &self,
        method: HttpMethod,
        url: &str,
        response: HttpResponse,
    ) -> Result<ResponseBody, ApiError> {
        let success = response.is_success();
        let status = response.status;
        let content_type = response.header(CONTENT_TYPE).map(str::to_string);
        let body = ResponseBody::classify(content_type.as_deref(), response.body);

        if !success {
            tracing::warn!(status, %method, url, "request failed");
            return Err(HttpError::new(status, method, url, body).into());
        }
        Ok(body)
    }

    /// Issue one request and return the classified body of a 2xx response.
    #[tracing::instrument(level = "debug", skip(self, body, options), fields(url))]
    pub fn request<B: Serialize + ?Sized>(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<ResponseBody, ApiError> {
        let request = self.build_request(path, method, body, options)?;
        tracing::Span::current().record("url", request.url.as_str());
        tracing::debug!(credentials = ?request.credentials, "sending request");

        let response = self.transport.execute(&request)?;
        tracing::debug!(status = response.status, "received response");

        self.parse_response(method, &request.url, response)
    }

    /// Issue one request and deserialize its JSON body into `R`.
    pub fn request_json<R, B>(
        &self,
        path: &str,
        method: HttpMethod,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match self.request(path, method, body, options)? {
            ResponseBody::Json(value) => {
                serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
            }
            // A 2xx without a body reads as `null`, so `Option<_>` targets get `None`.
            ResponseBody::Empty => serde_json::from_value(serde_json::Value::Null).map_err(|_| {
                ApiError::UnexpectedBody {
                    url: self.compose_url(path),
                    body: ResponseBody::Empty,
                }
            }),
            other => Err(ApiError::UnexpectedBody {
                url: self.compose_url(path),
                body: other,
            }),
        }
    }

    pub fn get<R: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<R, ApiError> {
        self.request_json(path, HttpMethod::Get, None::<&()>, options)
    }

    pub fn post<R, B>(&self, path: &str, body: Option<&B>, options: &RequestOptions) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(path, HttpMethod::Post, body, options)
    }

    pub fn put<R, B>(&self, path: &str, body: Option<&B>, options: &RequestOptions) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(path, HttpMethod::Put, body, options)
    }

    pub fn patch<R, B>(&self, path: &str, body: Option<&B>, options: &RequestOptions) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request_json(path, HttpMethod::Patch, body, options)
    }

    pub fn delete<R: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<R, ApiError> {
        self.request_json(path, HttpMethod::Delete, None::<&()>, options)
    }
}

fn is_absolute_http(path: &str) -> bool {
    let lower = |n: usize| path.get(..n).map(str::to_ascii_lowercase);
    lower(7).as_deref() == Some("http://") || lower(8).as_deref() == Some("https://")
}
