// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use relational_auth_server::api::router;
use relational_auth_server::auth::SystemClock;
use relational_auth_server::config::AppConfig;
use relational_auth_server::providers::KakaoGateway;
use relational_auth_server::state::AppState;
use relational_auth_server::storage::InMemoryUserDirectory;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AppConfig::from_env().expect("Failed to load configuration");

    let provider = KakaoGateway::new(config.kakao_user_info_url.clone())
        .expect("Failed to build identity provider gateway");

    let state = AppState::new(
        &config,
        Arc::new(provider),
        Arc::new(InMemoryUserDirectory::new()),
        Arc::new(SystemClock),
    );
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");

    tracing::info!(addr = %config.bind_addr, "auth server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

/// `LOG_FORMAT=json` switches to JSON output for log aggregation;
/// anything else stays human-readable. `RUST_LOG` filters as usual.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let json = env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
