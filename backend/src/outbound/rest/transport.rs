//! Shared HTTP plumbing for the hosted data API.

use std::time::Duration;

use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Failures at the transport boundary, before any port-level mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The host could not be reached or the request timed out.
    #[error("data API unreachable: {message}")]
    Connection {
        /// Underlying failure description.
        message: String,
    },
    /// The host answered with a non-success status.
    #[error("data API returned status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body preview.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("data API response could not be decoded: {message}")]
    Decode {
        /// Underlying failure description.
        message: String,
    },
}

impl TransportError {
    /// Connection-failure constructor.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Decode-failure constructor.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Whether the host reported a client-side (4xx) failure.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status >= 400 && *status < 500)
    }
}

fn map_request_error(error: reqwest::Error) -> TransportError {
    TransportError::connection(error.to_string())
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

/// A reqwest client bound to one hosted data API project.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct RestTransport {
    client: Client,
    base_url: Url,
    service_key: String,
}

impl RestTransport {
    /// Build a transport with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base_url: Url,
        service_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            service_key: service_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|error| TransportError::decode(format!("invalid endpoint {path:?}: {error}")))
    }

    async fn send(
        &self,
        method: Method,
        url: Url,
        filters: &[(&str, String)],
        body: Option<&Value>,
        prefer: Option<&str>,
    ) -> Result<Vec<u8>, TransportError> {
        let mut request = self
            .client
            .request(method, url)
            .query(filters)
            .header("apikey", self.service_key.as_str())
            .bearer_auth(self.service_key.as_str())
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(prefer) = prefer {
            request = request.header("Prefer", prefer);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(map_request_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(map_request_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, bytes.as_ref()));
        }
        Ok(bytes.to_vec())
    }

    /// Read rows from `table` with PostgREST-style filters.
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, TransportError> {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        let body = self.send(Method::GET, url, filters, None, None).await?;
        serde_json::from_slice(&body).map_err(|error| TransportError::decode(error.to_string()))
    }

    /// Insert one row into `table`.
    pub async fn insert<B: Serialize>(&self, table: &str, row: &B) -> Result<(), TransportError> {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        let body = serde_json::to_value(row)
            .map_err(|error| TransportError::decode(error.to_string()))?;
        self.send(
            Method::POST,
            url,
            &[],
            Some(&body),
            Some("return=minimal"),
        )
        .await?;
        Ok(())
    }

    /// Patch rows matching the filters and return how many were touched.
    pub async fn update(
        &self,
        table: &str,
        filters: &[(&str, String)],
        patch: &Value,
    ) -> Result<usize, TransportError> {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        let body = self
            .send(
                Method::PATCH,
                url,
                filters,
                Some(patch),
                Some("return=representation"),
            )
            .await?;
        count_rows(&body)
    }

    /// Delete rows matching the filters and return how many were removed.
    pub async fn delete(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<usize, TransportError> {
        let url = self.endpoint(&format!("rest/v1/{table}"))?;
        let body = self
            .send(
                Method::DELETE,
                url,
                filters,
                None,
                Some("return=representation"),
            )
            .await?;
        count_rows(&body)
    }

    /// Invoke the named procedure with a JSON payload.
    pub async fn invoke(&self, name: &str, payload: &Value) -> Result<Value, TransportError> {
        let url = self.endpoint(&format!("functions/v1/{name}"))?;
        let body = self.send(Method::POST, url, &[], Some(payload), None).await?;
        if body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&body).map_err(|error| TransportError::decode(error.to_string()))
    }
}

fn count_rows(body: &[u8]) -> Result<usize, TransportError> {
    let rows: Vec<Value> = serde_json::from_slice(body)
        .map_err(|error| TransportError::decode(error.to_string()))?;
    Ok(rows.len())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> TransportError {
    TransportError::Status {
        status: status.as_u16(),
        message: body_preview(body),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network transport helpers.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(400, true)]
    #[case(404, true)]
    #[case(409, true)]
    #[case(500, false)]
    #[case(503, false)]
    fn client_error_detection_follows_the_status_class(
        #[case] status: u16,
        #[case] expected: bool,
    ) {
        let error = TransportError::Status {
            status,
            message: String::new(),
        };
        assert_eq!(error.is_client_error(), expected);
    }

    #[test]
    fn connection_errors_are_never_client_errors() {
        assert!(!TransportError::connection("refused").is_client_error());
    }

    #[test]
    fn row_counting_reads_the_representation_array() {
        assert_eq!(count_rows(b"[]").expect("decodes"), 0);
        assert_eq!(count_rows(br#"[{"id":1},{"id":2}]"#).expect("decodes"), 2);
        assert!(matches!(
            count_rows(b"not json"),
            Err(TransportError::Decode { .. })
        ));
    }

    #[test]
    fn status_errors_carry_a_compact_body_preview() {
        let long_body = "x".repeat(400);
        let error = map_status_error(StatusCode::BAD_GATEWAY, long_body.as_bytes());
        let TransportError::Status { status, message } = error else {
            panic!("expected status error");
        };
        assert_eq!(status, 502);
        assert!(message.len() < 200);
        assert!(message.ends_with("..."));
    }
}
