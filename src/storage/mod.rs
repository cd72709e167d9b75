// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # User Directory
//!
//! Record store for user accounts, keyed three ways: internal id, external
//! identity id, and current refresh token. The authentication service is
//! the only writer, and it mutates records exclusively through this trait.
//!
//! ## Consistency model
//!
//! No cross-record guarantees; each record is independently consistent.
//! Refresh rotation relies on [`UserDirectory::replace_refresh_credential`],
//! a per-record compare-and-swap keyed on the previous token value, so two
//! rotations presenting the same token cannot both succeed.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use memory::InMemoryUserDirectory;

/// A refresh token and its expiry, always replaced as a unit.
///
/// Modeling the pair as one type keeps "token without expiry" (and the
/// reverse) unrepresentable on a [`UserRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshGrant {
    pub credential: String,
    pub expires_at: DateTime<Utc>,
}

/// A user account.
///
/// Created on first successful login for an unseen external identity;
/// never deleted. Holds at most one live refresh grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    /// Provider-scoped identity id; unique across records.
    pub external_identity_id: String,
    pub refresh: Option<RefreshGrant>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// Compare-and-swap lost: the record's refresh token no longer matches
    /// the expected previous value.
    #[error("refresh token was concurrently replaced")]
    Conflict,

    #[error("user record not found")]
    NotFound,

    #[error("directory storage failure: {0}")]
    Storage(String),
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_external_identity(
        &self,
        external_id: &str,
    ) -> Result<Option<UserRecord>, DirectoryError>;

    async fn find_by_refresh_credential(
        &self,
        credential: &str,
    ) -> Result<Option<UserRecord>, DirectoryError>;

    /// Create a record for a previously-unseen external identity.
    async fn create(&self, external_id: &str) -> Result<UserRecord, DirectoryError>;

    /// Upsert a whole record. Safe to call concurrently for different
    /// records; offers no conflict detection.
    async fn save(&self, record: UserRecord) -> Result<UserRecord, DirectoryError>;

    /// Atomically replace the refresh grant of one record, but only while
    /// its current token still equals `expected_current` (`None` = no grant
    /// set). Fails with [`DirectoryError::Conflict`] otherwise.
    async fn replace_refresh_credential(
        &self,
        user_id: Uuid,
        expected_current: Option<&str>,
        grant: RefreshGrant,
    ) -> Result<UserRecord, DirectoryError>;
}
