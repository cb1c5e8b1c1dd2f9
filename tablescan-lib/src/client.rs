//! Main TablescanClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::error::ApiError;
use crate::error::Error;

/// The client for the table recognition service.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks safely. All service operations are provided through the
/// [`TableService`](crate::api::TableService) trait.
///
/// # Example
///
/// ```ignore
/// use tablescan_lib::TablescanClient;
/// use tablescan_lib::api::TableService;
///
/// let client = TablescanClient::builder()
///     .url("http://localhost:8000")
///     .build()?;
///
/// let task = client.get_task(&task_id).await?;
/// ```
#[derive(Clone)]
pub struct TablescanClient {
    pub(crate) inner: Arc<TablescanClientInner>,
}

pub(crate) struct TablescanClientInner {
    pub(crate) base_url: String,
    pub(crate) api_prefix: String,
    pub(crate) http_client: Client,
    pub(crate) timeout: Option<Duration>,
}

impl TablescanClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> TablescanClientBuilder<Missing> {
        TablescanClientBuilder::new()
    }

    /// Returns the base URL of the service.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns the path prefix all endpoints live under.
    pub fn api_prefix(&self) -> &str {
        &self.inner.api_prefix
    }
}

impl std::fmt::Debug for TablescanClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TablescanClient")
            .field("base_url", &self.inner.base_url)
            .field("api_prefix", &self.inner.api_prefix)
            .field("timeout", &self.inner.timeout)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`TablescanClient`].
///
/// Uses the typestate pattern to ensure the service URL is set at compile time.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tablescan_lib::TablescanClient;
///
/// let client = TablescanClient::builder()
///     .url("http://localhost:8000")
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
///
/// assert_eq!(client.api_prefix(), "/api/v1");
/// ```
pub struct TablescanClientBuilder<U> {
    url: U,
    api_prefix: String,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl TablescanClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            api_prefix: "/api/v1".to_string(),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the service base URL (scheme, host and port).
    pub fn url(self, url: impl Into<String>) -> TablescanClientBuilder<Set<String>> {
        TablescanClientBuilder {
            url: Set(url.into()),
            api_prefix: self.api_prefix,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for TablescanClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> TablescanClientBuilder<U> {
    /// Sets the path prefix of the API.
    ///
    /// Defaults to `/api/v1`.
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.api_prefix = format!("/{}", prefix.trim_matches('/'));
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl TablescanClientBuilder<Set<String>> {
    /// Builds the [`TablescanClient`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if the URL is not an absolute http(s)
    /// URL, or a network error if the HTTP client cannot be created.
    pub fn build(self) -> Result<TablescanClient, Error> {
        let raw = self.url.0;
        let parsed = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(format!("{raw}: unsupported scheme")).into());
        }

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::from)?
            }
        };

        Ok(TablescanClient {
            inner: Arc::new(TablescanClientInner {
                base_url: raw.trim_end_matches('/').to_string(),
                api_prefix: self.api_prefix,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}
