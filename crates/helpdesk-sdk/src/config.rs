//! SDK configuration.
//!
//! Built from environment variables at startup; front ends override
//! individual fields (e.g. from command-line flags) before constructing the
//! [`BackendClient`](crate::BackendClient).

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::cipher::{CipherError, PassphraseCipher, DEFAULT_PASSPHRASE};

/// Default backend base URL.
pub const DEFAULT_API_URL: &str = "http://localhost:7005/v1";

/// Default per-request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Client-side configuration.
#[derive(Debug)]
pub struct SdkConfig {
    /// Backend base URL, including any version prefix.
    pub api_url: String,
    /// Passphrase the credential cipher key is derived from.
    pub cipher_passphrase: SecretString,
    /// Per-request timeout; bounds how long a view can stay loading.
    pub http_timeout: Duration,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            cipher_passphrase: SecretString::from(DEFAULT_PASSPHRASE.to_string()),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }
}

impl SdkConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                     | Default                    | Description                       |
    /// |------------------------------|----------------------------|-----------------------------------|
    /// | `HELPDESK_API_URL`           | `http://localhost:7005/v1` | Backend base URL                  |
    /// | `HELPDESK_CIPHER_PASSPHRASE` | compiled-in constant       | Credential cipher passphrase      |
    /// | `HELPDESK_HTTP_TIMEOUT_SECS` | `30`                       | Per-request timeout in seconds    |
    ///
    /// Unparseable or empty values fall back to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = non_empty("HELPDESK_API_URL").unwrap_or(defaults.api_url);
        let cipher_passphrase = non_empty("HELPDESK_CIPHER_PASSPHRASE")
            .map(SecretString::from)
            .unwrap_or(defaults.cipher_passphrase);
        let http_timeout = non_empty("HELPDESK_HTTP_TIMEOUT_SECS")
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(defaults.http_timeout, Duration::from_secs);

        Self {
            api_url,
            cipher_passphrase,
            http_timeout,
        }
    }

    /// Override the backend base URL.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Build the credential cipher for this configuration.
    pub fn cipher(&self) -> Result<PassphraseCipher, CipherError> {
        PassphraseCipher::new(self.cipher_passphrase.expose_secret())
    }
}
