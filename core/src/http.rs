//! HTTP exchange types described as plain data.
//!
//! # Design
//! `HttpClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network; a `Transport` performs the exchange in
//! between. Keeping both ends as owned data makes the client deterministic
//! under test: a fake transport can record requests and replay canned
//! responses.

use std::fmt;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the transport should attach and store session cookies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Credentials {
    /// No cookies are sent; responses cannot establish a session.
    #[default]
    Omit,
    /// Cookies from earlier credentialed exchanges are sent and updated.
    Include,
}

/// Per-call options merged into the request by `HttpClient::build_request`.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers. Merged after the default `Content-Type`, so a caller
    /// entry with the same name replaces it.
    pub headers: Vec<(String, String)>,
    pub credentials: Credentials,
}

impl RequestOptions {
    /// Options for calls that rely on the session cookie.
    pub fn credentialed() -> Self {
        Self {
            credentials: Credentials::Include,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// An HTTP request described as plain data.
///
/// `url` is always absolute; `HttpClient::compose_url` resolves relative
/// paths before the request reaches a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub credentials: Credentials,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

/// A response body after content-type classification.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
    Empty,
}

impl ResponseBody {
    /// Classify raw response text.
    ///
    /// A JSON content type whose body does not parse falls back to `Text`
    /// carrying the raw body instead of failing.
    pub fn classify(content_type: Option<&str>, text: String) -> Self {
        if text.is_empty() {
            return ResponseBody::Empty;
        }
        let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
        if !is_json {
            return ResponseBody::Text(text);
        }
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(text),
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ResponseBody::Empty)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .rev()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_content_type_parses_body() {
        let body = ResponseBody::classify(
            Some("application/json; charset=utf-8"),
            r#"{"message":"ok"}"#.to_string(),
        );
        assert_eq!(body, ResponseBody::Json(serde_json::json!({ "message": "ok" })));
    }

    #[test]
    fn invalid_json_falls_back_to_text() {
        let body = ResponseBody::classify(Some("application/json"), "{not json".to_string());
        assert_eq!(body, ResponseBody::Text("{not json".to_string()));
    }

    #[test]
    fn non_json_content_type_stays_text() {
        let body = ResponseBody::classify(Some("text/plain"), r#"{"a":1}"#.to_string());
        assert_eq!(body, ResponseBody::Text(r#"{"a":1}"#.to_string()));
    }

    #[test]
    fn empty_body_is_empty_regardless_of_type() {
        assert!(ResponseBody::classify(Some("application/json"), String::new()).is_empty());
        assert!(ResponseBody::classify(None, String::new()).is_empty());
    }

    #[test]
    fn header_lookup_ignores_case_and_prefers_last() {
        let response = HttpResponse {
            status: 200,
            headers: vec![
                ("content-type".to_string(), "text/plain".to_string()),
                ("Content-Type".to_string(), "application/json".to_string()),
            ],
            body: String::new(),
        };
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn success_range_is_inclusive() {
        let at = |status| HttpResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
        };
        assert!(at(200).is_success());
        assert!(at(299).is_success());
        assert!(!at(199).is_success());
        assert!(!at(300).is_success());
    }
}
