//! Model and transport configuration.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

/// Environment variable holding the API base URL.
pub const ENV_API_BASE: &str = "FOCUSFLOW_API_BASE";

/// Environment variable holding the bearer token.
pub const ENV_TOKEN: &str = "FOCUSFLOW_TOKEN";

/// Environment variable holding an optional HTTP proxy.
pub const ENV_PROXY: &str = "FOCUSFLOW_PROXY";

/// A secret string type for sensitive data like access tokens.
/// Prevents accidental logging or display of secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    /// Create a new secret string.
    pub fn new(s: String) -> Self {
        Self(s)
    }

    /// Get the underlying secret value.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }
}

impl Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretString([REDACTED])")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

/// Supplies the bearer token attached to each request.
///
/// Looked up per request, so a provider may rotate or clear its token
/// between calls.
pub trait CredentialProvider: Debug + Send + Sync {
    fn bearer_token(&self) -> Option<SecretString>;
}

/// A fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(pub SecretString);

impl CredentialProvider for StaticToken {
    fn bearer_token(&self) -> Option<SecretString> {
        Some(self.0.clone())
    }
}

/// Anonymous access; no `Authorization` header is sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn bearer_token(&self) -> Option<SecretString> {
        None
    }
}

/// Generation parameters sent with every request.
///
/// # Example
/// ```rust
/// use focusflow_ai::options::ModelOptions;
/// use std::time::Duration;
///
/// let options = ModelOptions::default()
///     .with_model("gpt-5-mini".to_string())
///     .with_timeout(Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOptions {
    /// Model identifier; the server default is used when absent
    pub model: Option<String>,

    /// Server-side generation timeout (1-300 seconds)
    pub timeout: Option<Duration>,
}

impl ModelOptions {
    /// Set the model identifier.
    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    /// Set the generation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Generic transport options containing truly generic transport fields
/// and provider-specific transport configuration.
///
/// # Example
/// ```rust
/// use focusflow_ai::options::{HttpTransport, TransportOptions};
/// use std::time::Duration;
///
/// let options = TransportOptions::new(
///     HttpTransport::new("token").with_base_url("https://focusflow.example/api".to_string()),
/// )
/// .with_timeout(Duration::from_secs(120));
/// ```
#[derive(Debug, Clone)]
pub struct TransportOptions<T> {
    /// HTTP client timeout. Covers the whole streamed body, so keep it
    /// longer than the generation timeout.
    pub timeout: Option<Duration>,

    /// Provider-specific transport options
    pub provider: T,
}

impl<T> TransportOptions<T> {
    /// Create new transport options with provider-specific configuration.
    pub fn new(provider: T) -> Self {
        Self {
            timeout: None,
            provider,
        }
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP-specific transport options.
/// Used as the provider field in `TransportOptions<HttpTransport>`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// Base URL of the API, e.g. `http://localhost:8000/api`
    pub base_url: Option<String>,

    /// Source of the bearer token
    pub credentials: Arc<dyn CredentialProvider>,

    /// HTTP proxy URL
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests
    pub extra_headers: Option<HashMap<String, String>>,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self {
            base_url: None,
            credentials: Arc::new(NoCredentials),
            proxy: None,
            extra_headers: None,
        }
    }
}

impl HttpTransport {
    /// Create new HTTP transport options with a fixed bearer token.
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self::default().with_credentials(StaticToken(token.into()))
    }

    /// Read `FOCUSFLOW_API_BASE`, `FOCUSFLOW_TOKEN` and `FOCUSFLOW_PROXY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let transport = Self {
            base_url: get(ENV_API_BASE),
            proxy: get(ENV_PROXY),
            ..Self::default()
        };
        match get(ENV_TOKEN) {
            Some(token) => transport.with_credentials(StaticToken(SecretString::new(token))),
            None => transport,
        }
    }

    /// Base URL without a trailing slash.
    pub fn api_base(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }

    /// Use a custom credential provider.
    pub fn with_credentials(mut self, credentials: impl CredentialProvider + 'static) -> Self {
        self.credentials = Arc::new(credentials);
        self
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
        self
    }
}
