//! Transports execute one `HttpRequest` and hand back the `HttpResponse`.
//!
//! `UreqTransport` is the default network implementation. `RecordingTransport`
//! replays canned responses and keeps every request it saw, for tests and
//! for callers that want to drive the client without a network.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, RequestBuilder};

use crate::error::ApiError;
use crate::http::{Credentials, HttpMethod, HttpRequest, HttpResponse};

/// Performs a single HTTP exchange.
///
/// Implementations report any status code as a response; only failures to
/// complete the exchange are errors.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

/// Blocking transport backed by `ureq`.
///
/// Credentialed requests go through an agent whose cookie jar holds the
/// session; anonymous requests use a second agent that never sees it.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    credentialed: Agent,
    anonymous: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self {
            credentialed: Self::agent(),
            anonymous: Self::agent(),
        }
    }

    // Status codes are data here; HttpClient decides what counts as failure.
    fn agent() -> Agent {
        Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent()
    }

    fn agent_for(&self, credentials: Credentials) -> &Agent {
        match credentials {
            Credentials::Include => &self.credentialed,
            Credentials::Omit => &self.anonymous,
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent_for(request.credentials);
        let url = request.url.as_str();
        let body = request.body.as_deref();

        let result = match request.method {
            HttpMethod::Get => send_without_body(with_headers(agent.get(url), request), body),
            HttpMethod::Delete => send_without_body(with_headers(agent.delete(url), request), body),
            HttpMethod::Post => send_with_body(with_headers(agent.post(url), request), body),
            HttpMethod::Put => send_with_body(with_headers(agent.put(url), request), body),
            HttpMethod::Patch => send_with_body(with_headers(agent.patch(url), request), body),
        };

        let mut response = result.map_err(|e| ApiError::Transport {
            url: request.url.clone(),
            message: e.to_string(),
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport {
                url: request.url.clone(),
                message: e.to_string(),
            })?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, request: &HttpRequest) -> RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_with_body(
    builder: RequestBuilder<WithBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn send_without_body(
    builder: RequestBuilder<WithoutBody>,
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.force_send_body().send(body.as_bytes()),
        None => builder.call(),
    }
}

/// In-memory transport that replays queued responses in order.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unanswered request.
    pub fn push_response(&self, response: HttpResponse) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(response);
    }

    /// Queue a JSON response with the given status.
    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_response(HttpResponse {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        });
    }

    /// Every request executed so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Transport for RecordingTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| ApiError::Transport {
                url: request.url.clone(),
                message: "no response queued".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: Vec::new(),
            body: None,
            credentials: Credentials::Omit,
        }
    }

    #[test]
    fn recording_transport_replays_in_order() {
        let transport = RecordingTransport::new();
        transport.push_json(200, serde_json::json!({ "n": 1 }));
        transport.push_json(201, serde_json::json!({ "n": 2 }));

        let first = transport.execute(&request("http://a/1")).unwrap();
        let second = transport.execute(&request("http://a/2")).unwrap();

        assert_eq!(first.status, 200);
        assert_eq!(second.status, 201);
        let urls: Vec<_> = transport.requests().into_iter().map(|r| r.url).collect();
        assert_eq!(urls, vec!["http://a/1", "http://a/2"]);
    }

    #[test]
    fn recording_transport_errors_when_exhausted() {
        let transport = RecordingTransport::new();
        let err = transport.execute(&request("http://a/")).unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn unreachable_host_is_transport_error() {
        let transport = UreqTransport::new();
        let err = transport.execute(&request("http://127.0.0.1:1/")).unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
    }
}
