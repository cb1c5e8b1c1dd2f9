//! Request execution
//!
//! Low-level helpers shared by all service operations: URL building, sending,
//! error-body extraction and envelope decoding.

use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;

use crate::TablescanClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::TaskId;
use crate::response::Envelope;

impl TablescanClient {
    pub(crate) fn build_url(&self, path: &str) -> String {
        format!("{}{}{}", self.inner.base_url, self.inner.api_prefix, path)
    }

    /// Builds the URL of a per-task endpoint, e.g. `/ocr/start/{task_id}`.
    pub(crate) fn task_url(&self, path: &str, task_id: &TaskId) -> String {
        self.build_url(&format!("{}/{}", path, urlencoding::encode(task_id.as_str())))
    }

    /// Starts a request with the client-wide timeout applied.
    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        log::debug!("{} {}", method, url);
        let mut request = self.inner.http_client.request(method, url);
        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }
        request
    }

    /// Sends a request, turning non-2xx responses into [`ApiError::Http`].
    ///
    /// `fallback` names the operation; it is used as the error message when
    /// the response body carries none.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<reqwest::Response, Error> {
        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await.unwrap_or_default();
        let fallback = format!("{}: {}", fallback, status.canonical_reason().unwrap_or("Unknown"));
        let message = error_message(content_type.as_deref(), &body, &fallback);

        log::debug!("HTTP {} from service: {}", status.as_u16(), message);
        Err(ApiError::http(status.as_u16(), message).into())
    }

    /// Sends a request and decodes the enveloped JSON payload.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<T, Error> {
        let envelope: Envelope<T> = self.send_envelope(request, fallback).await?;
        Ok(envelope.into_data()?)
    }

    /// Sends a request whose payload is irrelevant; only success matters.
    pub(crate) async fn send_ack(&self, request: RequestBuilder, fallback: &str) -> Result<(), Error> {
        let envelope: Envelope<serde_json::Value> = self.send_envelope(request, fallback).await?;
        log::debug!("service acknowledged: {}", envelope.message());
        Ok(())
    }

    async fn send_envelope<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<Envelope<T>, Error> {
        let response = self.send(request, fallback).await?;
        let body = response.text().await.map_err(ApiError::from)?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body).into())
    }
}

/// Extracts a human-readable message from an error response body.
///
/// JSON bodies yield their `detail` (FastAPI) or `message` field; other
/// bodies are used verbatim. Empty or unparseable bodies yield `fallback`.
pub(crate) fn error_message(content_type: Option<&str>, body: &str, fallback: &str) -> String {
    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
            return fallback.to_string();
        };
        let field = value.get("detail").or_else(|| value.get("message"));
        return match field {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
            Some(serde_json::Value::Null) | None => fallback.to_string(),
            // Validation errors come back as a list of objects.
            Some(other) => other.to_string(),
        };
    }

    if body.is_empty() {
        fallback.to_string()
    } else {
        body.to_string()
    }
}
