// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Federated login and token handling for the Relational Auth API.
//!
//! ## Auth Flow
//!
//! 1. Client authenticates with the identity provider and obtains a
//!    provider access token
//! 2. Client sends it to `POST /auth/login`; the service resolves the
//!    external identity, rotates the stored refresh token, and returns
//!    `{accessToken, refreshToken}`
//! 3. Subsequent requests carry `Authorization: Bearer <accessToken>`;
//!    the gate validates it and attaches the caller's identity
//! 4. When the access token expires, the client exchanges its refresh
//!    token at `POST /auth/token/refresh`; refresh tokens are single-use
//!    and replaced on every rotation
//!
//! ## Security
//!
//! - All non-exempt endpoints require a valid access token
//! - Access tokens are HS256-signed and verified locally, no remote calls
//! - Refresh tokens are 32 random bytes; a stolen token dies on first
//!   legitimate rotation
//! - Token-validation failure detail is logged but never sent to clients

pub mod clock;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod service;
pub mod token;

pub use clock::{Clock, SystemClock};
pub use error::AuthError;
pub use identity::{Auth, AuthenticatedIdentity};
pub use service::AuthService;
pub use token::{TokenCodec, TokenError};
