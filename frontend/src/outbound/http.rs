//! Reqwest-backed API transport.
//!
//! This adapter owns transport details only: URL resolution, header and body
//! serialisation, timeout mapping, and JSON decoding of response bodies. It
//! reports every status back to the gateway without interpreting it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::Value;

use crate::domain::ports::{ApiRequest, ApiResponse, ApiTransport, ApiTransportError, HttpMethod};

/// API transport that resolves request paths against one origin.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Build a transport, optionally enforcing a request timeout.
    /// ```rust,ignore
    /// let transport = ReqwestTransport::new(Url::parse("http://localhost:5000")?, None)?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let builder = Client::builder();
        let builder = match timeout {
            Some(limit) => builder.timeout(limit),
            None => builder,
        };
        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    fn resolve(&self, path: &str) -> Result<Url, ApiTransportError> {
        if !path.starts_with('/') {
            return Err(ApiTransportError::invalid_request(format!(
                "api path must be absolute: {path}"
            )));
        }
        self.base_url.join(path).map_err(|err| {
            ApiTransportError::invalid_request(format!("invalid api path {path}: {err}"))
        })
    }
}

#[async_trait]
impl ApiTransport for ReqwestTransport {
    async fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiTransportError> {
        let url = self.resolve(&request.path)?;
        let mut builder = self
            .client
            .request(to_method(request.method), url)
            .header(reqwest::header::ACCEPT, "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok(ApiResponse {
            status: status.as_u16(),
            body: decode_body(status, body.as_ref())?,
        })
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

/// Parse a response body.
///
/// Empty bodies become `Null`. A successful response must carry JSON; error
/// responses that are not JSON are kept as a compact string preview so the
/// gateway can still surface them.
fn decode_body(status: StatusCode, body: &[u8]) -> Result<Value, ApiTransportError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    match serde_json::from_slice(body) {
        Ok(value) => Ok(value),
        Err(err) if status.is_success() => Err(ApiTransportError::decode(format!(
            "invalid JSON payload: {err}"
        ))),
        Err(_) => Ok(Value::String(body_preview(body))),
    }
}

fn map_transport_error(error: reqwest::Error) -> ApiTransportError {
    if error.is_timeout() {
        ApiTransportError::timeout(error.to_string())
    } else {
        ApiTransportError::transport(error.to_string())
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network transport helpers.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn transport() -> ReqwestTransport {
        ReqwestTransport::new(
            Url::parse("http://localhost:5000/ignored/").expect("valid base url"),
            Some(Duration::from_secs(5)),
        )
        .expect("client should build")
    }

    #[rstest]
    #[case("/api/questions?page=2", "http://localhost:5000/api/questions?page=2")]
    #[case("/api/search", "http://localhost:5000/api/search")]
    fn absolute_paths_replace_the_base_path(#[case] path: &str, #[case] expected: &str) {
        let url = transport().resolve(path).expect("path should resolve");
        assert_eq!(url.as_str(), expected);
    }

    #[test]
    fn relative_paths_are_rejected() {
        let error = transport().resolve("api/questions").expect_err("relative path");
        assert!(matches!(error, ApiTransportError::InvalidRequest { .. }));
    }

    #[rstest]
    #[case::empty(StatusCode::NO_CONTENT, b"".as_slice(), Value::Null)]
    #[case::json(StatusCode::OK, br#"{"success":true}"#.as_slice(), json!({ "success": true }))]
    #[case::html_error(
        StatusCode::BAD_GATEWAY,
        b"<html>\n  <body>bad gateway</body>\n</html>".as_slice(),
        json!("<html> <body>bad gateway</body> </html>")
    )]
    fn bodies_are_decoded(#[case] status: StatusCode, #[case] body: &[u8], #[case] expected: Value) {
        assert_eq!(decode_body(status, body).expect("body should decode"), expected);
    }

    #[test]
    fn non_json_success_is_a_decode_error() {
        let error = decode_body(StatusCode::OK, b"<html/>").expect_err("decode should fail");
        assert!(matches!(error, ApiTransportError::Decode { .. }));
    }

    #[test]
    fn previews_are_truncated() {
        let long = "x".repeat(200);
        let preview = body_preview(long.as_bytes());
        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }
}
