//! Response envelope

use serde::Deserialize;

use crate::error::ApiError;

/// The `{ success, message, data }` wrapper around every JSON response body.
///
/// # Example
///
/// ```
/// use tablescan_lib::Envelope;
///
/// let body = r#"{"success": true, "message": "操作成功", "data": 42}"#;
/// let envelope: Envelope<u32> = serde_json::from_str(body).unwrap();
///
/// assert!(envelope.is_success());
/// assert_eq!(envelope.into_data().unwrap(), 42);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

fn default_success() -> bool {
    true
}

impl<T> Envelope<T> {
    /// Returns `true` if the service reported success.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the service's message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns a reference to the payload, if any.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consumes the envelope and returns the payload.
    ///
    /// # Errors
    ///
    /// Returns a parse error if the payload is missing.
    pub fn into_data(self) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::parse(format!("Response has no data: {}", self.message)))
    }
}
