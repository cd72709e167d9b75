// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::middleware::ExemptPaths;
use crate::auth::{AuthService, Clock, TokenCodec};
use crate::config::AppConfig;
use crate::providers::IdentityProvider;
use crate::storage::UserDirectory;

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub codec: Arc<TokenCodec>,
    pub exempt_paths: Arc<ExemptPaths>,
}

impl AppState {
    pub fn new(
        config: &AppConfig,
        provider: Arc<dyn IdentityProvider>,
        directory: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let codec = Arc::new(TokenCodec::new(
            &config.signing_secret,
            config.access_token_ttl,
            clock.clone(),
        ));
        let auth = Arc::new(AuthService::new(
            provider,
            directory,
            codec.clone(),
            clock,
            config.refresh_token_ttl,
        ));

        Self {
            auth,
            codec,
            exempt_paths: Arc::new(config.exempt_paths.clone()),
        }
    }
}
