//! Cart client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STORECART_BASE_URL` - Origin of the cart service (e.g., `https://shop.example`)
//! - `STORECART_CSRF_TOKEN` - Anti-forgery token accepted by the cart service
//!
//! ## Optional
//! - `STORECART_ADD_PATH` - Add endpoint path (default: `/cart/add/`)
//! - `STORECART_UPDATE_PATH` - Update endpoint path (default: `/cart/update/`)
//! - `STORECART_DELETE_PATH` - Delete endpoint path (default: `/cart/delete/`)
//! - `STORECART_DISPATCH` - `concurrent` or `serialized` (default: `concurrent`)
//! - `STORECART_REQUEST_TIMEOUT_SECS` - Request timeout (default: none)
//! - `STORECART_CURRENCY` - Currency used to display totals (default: `USD`)

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use storecart_core::CurrencyCode;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "csrf_token",
    "{{",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Supplies the CSRF token for each request.
///
/// Pages that rotate their token implement this over whatever holds the
/// current value; a fixed token can use [`StaticCsrfToken`].
pub trait CsrfTokenProvider: Send + Sync {
    fn csrf_token(&self) -> SecretString;
}

/// A CSRF token that never changes for the life of the client.
#[derive(Clone)]
pub struct StaticCsrfToken(SecretString);

impl StaticCsrfToken {
    #[must_use]
    pub const fn new(token: SecretString) -> Self {
        Self(token)
    }
}

impl CsrfTokenProvider for StaticCsrfToken {
    fn csrf_token(&self) -> SecretString {
        self.0.clone()
    }
}

impl<F> CsrfTokenProvider for F
where
    F: Fn() -> SecretString + Send + Sync,
{
    fn csrf_token(&self) -> SecretString {
        self()
    }
}

/// Where an endpoint expects the CSRF token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrfPlacement {
    /// `csrfmiddlewaretoken` form field.
    FormField,
    /// `X-CSRFToken` request header.
    Header,
}

/// CSRF placement per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsrfPlacements {
    pub add: CsrfPlacement,
    pub update: CsrfPlacement,
    pub delete: CsrfPlacement,
}

impl Default for CsrfPlacements {
    fn default() -> Self {
        Self {
            add: CsrfPlacement::FormField,
            update: CsrfPlacement::FormField,
            delete: CsrfPlacement::Header,
        }
    }
}

/// How mutations from different controls are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DispatchMode {
    /// Requests from different controls run concurrently; the last response
    /// to arrive wins on shared displays.
    #[default]
    Concurrent,
    /// At most one mutation is in flight; others wait their turn.
    Serialized,
}

impl std::str::FromStr for DispatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "concurrent" => Ok(Self::Concurrent),
            "serialized" => Ok(Self::Serialized),
            other => Err(format!("expected `concurrent` or `serialized`, got `{other}`")),
        }
    }
}

/// The three mutating endpoints of the cart service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEndpoints {
    pub add_url: Url,
    pub update_url: Url,
    pub delete_url: Url,
}

impl CartEndpoints {
    pub const DEFAULT_ADD_PATH: &'static str = "/cart/add/";
    pub const DEFAULT_UPDATE_PATH: &'static str = "/cart/update/";
    pub const DEFAULT_DELETE_PATH: &'static str = "/cart/delete/";

    /// Endpoints at the default paths under `base`.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if a path cannot be joined onto `base`.
    pub fn with_default_paths(base: &Url) -> Result<Self, url::ParseError> {
        Self::with_paths(
            base,
            Self::DEFAULT_ADD_PATH,
            Self::DEFAULT_UPDATE_PATH,
            Self::DEFAULT_DELETE_PATH,
        )
    }

    /// Endpoints at the given paths under `base`.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if a path cannot be joined onto `base`.
    pub fn with_paths(
        base: &Url,
        add: &str,
        update: &str,
        delete: &str,
    ) -> Result<Self, url::ParseError> {
        Ok(Self {
            add_url: base.join(add)?,
            update_url: base.join(update)?,
            delete_url: base.join(delete)?,
        })
    }
}

/// Text shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    /// Label of an add control while its request is outstanding.
    pub adding_label: String,
    /// Label restored on an add control whose original label is unknown.
    pub add_label: String,
    pub add_confirmation: String,
    pub add_invalid: String,
    /// Prepended to the service message when an add fails.
    pub add_failure_prefix: String,
    /// Prepended to the service message when an update fails.
    pub update_failure_prefix: String,
    /// Used when a failed add or update carries no service message.
    pub unknown_error: String,
    pub delete_invalid: String,
    /// Delete answered with `success: false` and no message.
    pub delete_failed: String,
    /// Delete request failed outright and no message could be decoded.
    pub delete_transport_failed: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            adding_label: "Adding...".to_string(),
            add_label: "Add to Cart".to_string(),
            add_confirmation: "Product added to cart!".to_string(),
            add_invalid: "Please select a valid product and quantity.".to_string(),
            add_failure_prefix: "Failed to add to cart: ".to_string(),
            update_failure_prefix: "Failed to update cart: ".to_string(),
            unknown_error: "Unknown error".to_string(),
            delete_invalid: "Invalid product or action.".to_string(),
            delete_failed: "An error occurred.".to_string(),
            delete_transport_failed: "An error occurred. Please try again.".to_string(),
        }
    }
}

/// Cart client configuration.
///
/// Implements `Debug` manually to keep the CSRF token out of logs.
#[derive(Clone)]
pub struct CartClientConfig {
    pub endpoints: CartEndpoints,
    pub csrf_token_provider: Arc<dyn CsrfTokenProvider>,
    pub csrf_placements: CsrfPlacements,
    pub dispatch_mode: DispatchMode,
    /// `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
    pub currency: CurrencyCode,
    pub messages: Messages,
}

impl std::fmt::Debug for CartClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartClientConfig")
            .field("endpoints", &self.endpoints)
            .field("csrf_token_provider", &"[REDACTED]")
            .field("csrf_placements", &self.csrf_placements)
            .field("dispatch_mode", &self.dispatch_mode)
            .field("request_timeout", &self.request_timeout)
            .field("currency", &self.currency)
            .field("messages", &self.messages)
            .finish()
    }
}

impl CartClientConfig {
    /// Configuration with default placements, messages, and dispatch mode.
    #[must_use]
    pub fn new(endpoints: CartEndpoints, csrf_token_provider: Arc<dyn CsrfTokenProvider>) -> Self {
        Self {
            endpoints,
            csrf_token_provider,
            csrf_placements: CsrfPlacements::default(),
            dispatch_mode: DispatchMode::default(),
            request_timeout: None,
            currency: CurrencyCode::default(),
            messages: Messages::default(),
        }
    }

    #[must_use]
    pub const fn with_dispatch_mode(mut self, mode: DispatchMode) -> Self {
        self.dispatch_mode = mode;
        self
    }

    #[must_use]
    pub const fn with_csrf_placements(mut self, placements: CsrfPlacements) -> Self {
        self.csrf_placements = placements;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub const fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the CSRF token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("STORECART_BASE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STORECART_BASE_URL".to_string(), e.to_string())
        })?;

        let endpoints = CartEndpoints::with_paths(
            &base_url,
            &get_env_or_default("STORECART_ADD_PATH", CartEndpoints::DEFAULT_ADD_PATH),
            &get_env_or_default("STORECART_UPDATE_PATH", CartEndpoints::DEFAULT_UPDATE_PATH),
            &get_env_or_default("STORECART_DELETE_PATH", CartEndpoints::DEFAULT_DELETE_PATH),
        )
        .map_err(|e| ConfigError::InvalidEnvVar("STORECART_*_PATH".to_string(), e.to_string()))?;

        let csrf_token = get_validated_secret("STORECART_CSRF_TOKEN")?;

        let dispatch_mode = get_env_or_default("STORECART_DISPATCH", "concurrent")
            .parse::<DispatchMode>()
            .map_err(|e| ConfigError::InvalidEnvVar("STORECART_DISPATCH".to_string(), e))?;

        let request_timeout = get_optional_env("STORECART_REQUEST_TIMEOUT_SECS")
            .map(|secs| {
                secs.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "STORECART_REQUEST_TIMEOUT_SECS".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        let currency = get_env_or_default("STORECART_CURRENCY", "USD")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("STORECART_CURRENCY".to_string(), e))?;

        Ok(Self {
            endpoints,
            csrf_token_provider: Arc::new(StaticCsrfToken::new(csrf_token)),
            csrf_placements: CsrfPlacements::default(),
            dispatch_mode,
            request_timeout,
            currency,
            messages: Messages::default(),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // Token length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a token is not a placeholder (or an unrendered template tag)
/// and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.trim().is_empty() {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            "is empty".to_string(),
        ));
    }

    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the token the service issued."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
