//! Configuration types for the Contiamo client.
//!
//! - [`ContiamoConfig`]: settings shared by the client and its transport
//! - [`ContiamoConfigBuilder`]: builder for [`ContiamoConfig`]
//! - [`ApiKey`]: a validated API key with masked debug output
//! - [`BaseUrl`]: a validated API base URL
//!
//! # Example
//!
//! ```rust
//! use contiamo::{ApiKey, BaseUrl, ContiamoConfig};
//! use std::time::Duration;
//!
//! let config = ContiamoConfig::builder()
//!     .api_key(ApiKey::new("my-api-key").unwrap())
//!     .api_base(BaseUrl::new("https://api.contiamo.com").unwrap())
//!     .timeout(Duration::from_secs(30))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.tries(), 1);
//! ```

mod newtypes;

pub use newtypes::{ApiKey, BaseUrl};

use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for a Contiamo client.
///
/// Only the API key is required. Timeouts, retries and connection handling
/// are transport concerns; they are recorded here so the transport can be
/// constructed once per client.
#[derive(Clone, Debug)]
pub struct ContiamoConfig {
    api_key: ApiKey,
    api_base: BaseUrl,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    tries: u32,
}

impl ContiamoConfig {
    /// Creates a new builder for constructing a `ContiamoConfig`.
    #[must_use]
    pub fn builder() -> ContiamoConfigBuilder {
        ContiamoConfigBuilder::new()
    }

    /// Returns the API key.
    #[must_use]
    pub const fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn api_base(&self) -> &BaseUrl {
        &self.api_base
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the request-level timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns how many times the transport attempts each request.
    #[must_use]
    pub const fn tries(&self) -> u32 {
        self.tries
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ContiamoConfig>();
};

/// Builder for constructing [`ContiamoConfig`] instances.
///
/// # Defaults
///
/// - `api_base`: `https://api.contiamo.com`
/// - `user_agent_prefix`: `None`
/// - `timeout`: `None` (no request timeout)
/// - `tries`: `1` (no automatic retries)
#[derive(Debug, Default)]
pub struct ContiamoConfigBuilder {
    api_key: Option<ApiKey>,
    api_base: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
    timeout: Option<Duration>,
    tries: Option<u32>,
}

impl ContiamoConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key (required).
    #[must_use]
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn api_base(mut self, base: BaseUrl) -> Self {
        self.api_base = Some(base);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets a request-level timeout applied by the transport.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets how many times the transport attempts a request.
    ///
    /// Values above 1 enable retries of 429 and 500 responses. Zero is
    /// treated as 1.
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.tries = Some(tries);
        self
    }

    /// Builds the [`ContiamoConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `api_key` is not set
    /// and [`ConfigError::InvalidTimeout`] for a zero timeout.
    pub fn build(self) -> Result<ContiamoConfig, ConfigError> {
        let api_key = self
            .api_key
            .ok_or(ConfigError::MissingRequiredField { field: "api_key" })?;

        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(ContiamoConfig {
            api_key,
            api_base: self.api_base.unwrap_or_default(),
            user_agent_prefix: self.user_agent_prefix,
            timeout: self.timeout,
            tries: self.tries.unwrap_or(1).max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_api_key() {
        let result = ContiamoConfigBuilder::new().build();

        assert!(matches!(
            result,
            Err(ConfigError::MissingRequiredField { field: "api_key" })
        ));
    }

    #[test]
    fn test_builder_provides_sensible_defaults() {
        let config = ContiamoConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .build()
            .unwrap();

        assert_eq!(config.api_base().as_ref(), "https://api.contiamo.com");
        assert!(config.user_agent_prefix().is_none());
        assert!(config.timeout().is_none());
        assert_eq!(config.tries(), 1);
    }

    #[test]
    fn test_builder_with_all_optional_fields() {
        let config = ContiamoConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .api_base(BaseUrl::new("http://localhost:9000").unwrap())
            .user_agent_prefix("Notebook/2.1")
            .timeout(Duration::from_secs(5))
            .tries(3)
            .build()
            .unwrap();

        assert_eq!(config.api_base().as_ref(), "http://localhost:9000");
        assert_eq!(config.user_agent_prefix(), Some("Notebook/2.1"));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.tries(), 3);
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let result = ContiamoConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .timeout(Duration::ZERO)
            .build();

        assert!(matches!(result, Err(ConfigError::InvalidTimeout)));
    }

    #[test]
    fn test_zero_tries_is_clamped_to_one() {
        let config = ContiamoConfig::builder()
            .api_key(ApiKey::new("key").unwrap())
            .tries(0)
            .build()
            .unwrap();

        assert_eq!(config.tries(), 1);
    }

    #[test]
    fn test_config_debug_masks_api_key() {
        let config = ContiamoConfig::builder()
            .api_key(ApiKey::new("very-secret").unwrap())
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(debug_str.contains("ContiamoConfig"));
        assert!(!debug_str.contains("very-secret"));
    }
}
