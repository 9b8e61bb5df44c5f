//! Driven port for issuing HTTP calls against the Q&A API.
//!
//! The domain owns the request and response shapes so the gateway can stay
//! adapter-agnostic. Adapters only move bytes: they never interpret status
//! codes beyond reporting them.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case verb as sent on the wire.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound API request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: HttpMethod,
    /// Absolute API path including any query, e.g. `/api/questions?page=2`.
    pub path: String,
    /// Request headers keyed by name.
    pub headers: BTreeMap<String, String>,
    /// JSON body for mutating requests.
    pub body: Option<Value>,
}

/// Response returned by the transport, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body; a string preview for non-JSON error bodies; `Null`
    /// when empty.
    pub body: Value,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

define_port_error! {
    /// Errors surfaced while talking to the API.
    pub enum ApiTransportError {
        /// The request never produced a response.
        Transport { message: String } =>
            "api transport failed: {message}",
        /// The transport gave up waiting for a response.
        Timeout { message: String } =>
            "api request timed out: {message}",
        /// A successful response carried a body that is not JSON.
        Decode { message: String } =>
            "api response decode failed: {message}",
        /// The adapter rejected the request before sending it.
        InvalidRequest { message: String } =>
            "api request invalid: {message}",
    }
}

/// Port for sending API requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiTransport: Send + Sync {
    /// Send one request and return the response, whatever its status.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use frontend::domain::ports::{ApiRequest, ApiTransport, FixtureApiTransport, HttpMethod};
    ///
    /// let transport = FixtureApiTransport::default();
    /// let response = transport
    ///     .send(&ApiRequest {
    ///         method: HttpMethod::Get,
    ///         path: "/api/questions".to_owned(),
    ///         headers: Default::default(),
    ///         body: None,
    ///     })
    ///     .await?;
    /// assert_eq!(response.status, 404);
    /// # Ok::<(), frontend::domain::ports::ApiTransportError>(())
    /// ```
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiTransportError>;
}

type Scripted = Result<ApiResponse, ApiTransportError>;

/// Fixture transport replaying scripted responses per method and path.
///
/// Unscripted requests receive a `404` with the API's error envelope. Every
/// request is recorded so tests can assert on headers and bodies.
#[derive(Default)]
pub struct FixtureApiTransport {
    scripted: Mutex<HashMap<(HttpMethod, String), VecDeque<Scripted>>>,
    sent: Mutex<Vec<ApiRequest>>,
}

impl FixtureApiTransport {
    /// Queue a response for the next `method` request to `path`.
    pub fn respond(&self, method: HttpMethod, path: impl Into<String>, response: Scripted) {
        self.scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry((method, path.into()))
            .or_default()
            .push_back(response);
    }

    /// Queue a response with the given status and JSON body.
    pub fn respond_json(&self, method: HttpMethod, path: impl Into<String>, status: u16, body: Value) {
        self.respond(method, path, Ok(ApiResponse { status, body }));
    }

    /// Requests sent so far, oldest first.
    pub fn sent(&self) -> Vec<ApiRequest> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl fmt::Debug for FixtureApiTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureApiTransport")
            .field("sent", &self.sent().len())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ApiTransport for FixtureApiTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiTransportError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
        let next = self
            .scripted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&(request.method, request.path.clone()))
            .and_then(VecDeque::pop_front);
        next.unwrap_or_else(|| {
            Ok(ApiResponse {
                status: 404,
                body: serde_json::json!({
                    "success": false,
                    "error": 404,
                    "message": "resource not found",
                }),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the fixture transport.
    use super::*;
    use serde_json::json;

    fn get(path: &str) -> ApiRequest {
        ApiRequest {
            method: HttpMethod::Get,
            path: path.to_owned(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn replays_scripted_responses_in_order() {
        let transport = FixtureApiTransport::default();
        transport.respond_json(HttpMethod::Get, "/api/users/u", 200, json!({ "n": 1 }));
        transport.respond(
            HttpMethod::Get,
            "/api/users/u",
            Err(ApiTransportError::transport("reset")),
        );

        let first = transport.send(&get("/api/users/u")).await;
        let second = transport.send(&get("/api/users/u")).await;
        let third = transport.send(&get("/api/users/u")).await;

        assert_eq!(first.map(|r| r.body), Ok(json!({ "n": 1 })));
        assert_eq!(second, Err(ApiTransportError::transport("reset")));
        assert_eq!(third.map(|r| r.status), Ok(404));
        assert_eq!(transport.sent().len(), 3);
    }

    #[test]
    fn success_range_is_2xx() {
        let ok = ApiResponse { status: 204, body: Value::Null };
        let redirect = ApiResponse { status: 302, body: Value::Null };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }
}
