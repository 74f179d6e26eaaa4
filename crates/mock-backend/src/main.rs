//! Mock helpdesk backend: user accounts, Freshdesk tickets and HubSpot
//! contacts served from memory.
//!
//! API keys arrive in plaintext and are sealed with the passphrase from
//! [`AppConfig`] before they are stored, so a client sharing that
//! passphrase can reveal them.

mod app;
mod config;
mod error;
mod store;

use std::sync::Arc;

use helpdesk_sdk::PassphraseCipher;
use tracing::info;

use crate::app::{API_PREFIX, AppState};
use crate::config::AppConfig;
use crate::store::{DEMO_EMAIL, Store};

#[tokio::main]
async fn main() {
    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let cipher = PassphraseCipher::new(&config.cipher_passphrase)
        .expect("cipher passphrase is non-empty");
    let store = Store::seeded(&cipher);
    info!(email = DEMO_EMAIL, "demo account seeded");

    let listen_port = config.listen_port;
    let state = Arc::new(AppState::new(config, cipher, store));
    let app = app::router(state);

    let addr = format!("0.0.0.0:{listen_port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind listener");

    info!(address = %addr, prefix = API_PREFIX, "mock backend listening");
    axum::serve(listener, app).await.expect("server error");
}
