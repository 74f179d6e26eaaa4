//! Mock backend configuration.
//!
//! Built from environment variables at startup and shared with the Axum
//! handlers through [`axum::extract::State`].

use helpdesk_sdk::cipher::DEFAULT_PASSPHRASE;

/// Global configuration shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to listen on (default `7005`).
    pub listen_port: u16,
    /// Passphrase stored API keys are sealed with. Must match the client's
    /// `HELPDESK_CIPHER_PASSPHRASE` for a key to be revealed.
    pub cipher_passphrase: String,
    /// Where `/hubspot/connect` redirects once the user is linked.
    pub app_url: String,
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                          | Default                  | Description                  |
    /// |-----------------------------------|--------------------------|------------------------------|
    /// | `MOCK_BACKEND_PORT`               | `7005`                   | HTTP listen port             |
    /// | `MOCK_BACKEND_CIPHER_PASSPHRASE`  | built-in passphrase      | Seals stored API keys        |
    /// | `MOCK_BACKEND_APP_URL`            | `http://localhost:5173`  | Redirect after HubSpot link  |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let listen_port = lookup("MOCK_BACKEND_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(7005);
        let cipher_passphrase = lookup("MOCK_BACKEND_CIPHER_PASSPHRASE")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_PASSPHRASE.to_string());
        let app_url = lookup("MOCK_BACKEND_APP_URL")
            .unwrap_or_else(|| "http://localhost:5173".to_string());

        Self {
            listen_port,
            cipher_passphrase,
            app_url,
        }
    }
}
