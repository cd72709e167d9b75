// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory user directory.
//!
//! A `HashMap` behind a single `RwLock`. Lookups by external identity and
//! refresh token are linear scans; the write lock makes the refresh-token
//! compare-and-swap atomic per record.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DirectoryError, RefreshGrant, UserDirectory, UserRecord};

#[derive(Default)]
pub struct InMemoryUserDirectory {
    records: RwLock<HashMap<Uuid, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_external_identity(
        &self,
        external_id: &str,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| record.external_identity_id == external_id)
            .cloned())
    }

    async fn find_by_refresh_credential(
        &self,
        credential: &str,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|record| {
                record
                    .refresh
                    .as_ref()
                    .is_some_and(|grant| grant.credential == credential)
            })
            .cloned())
    }

    async fn create(&self, external_id: &str) -> Result<UserRecord, DirectoryError> {
        let record = UserRecord {
            id: Uuid::new_v4(),
            external_identity_id: external_id.to_string(),
            refresh: None,
        };

        let mut records = self.records.write().await;
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn save(&self, record: UserRecord) -> Result<UserRecord, DirectoryError> {
        let mut records = self.records.write().await;
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn replace_refresh_credential(
        &self,
        user_id: Uuid,
        expected_current: Option<&str>,
        grant: RefreshGrant,
    ) -> Result<UserRecord, DirectoryError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&user_id).ok_or(DirectoryError::NotFound)?;

        let current = record.refresh.as_ref().map(|g| g.credential.as_str());
        if current != expected_current {
            return Err(DirectoryError::Conflict);
        }

        record.refresh = Some(grant);
        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn grant(credential: &str) -> RefreshGrant {
        RefreshGrant {
            credential: credential.to_string(),
            expires_at: Utc::now() + Duration::days(14),
        }
    }

    #[tokio::test]
    async fn create_then_find_by_external_identity() {
        let directory = InMemoryUserDirectory::new();

        let created = directory.create("kakao:123").await.unwrap();
        let found = directory
            .find_by_external_identity("kakao:123")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found, created);
        assert!(found.refresh.is_none());
    }

    #[tokio::test]
    async fn find_by_refresh_credential_only_matches_current_value() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create("kakao:123").await.unwrap();

        directory
            .replace_refresh_credential(user.id, None, grant("first"))
            .await
            .unwrap();
        directory
            .replace_refresh_credential(user.id, Some("first"), grant("second"))
            .await
            .unwrap();

        assert!(directory
            .find_by_refresh_credential("first")
            .await
            .unwrap()
            .is_none());
        assert!(directory
            .find_by_refresh_credential("second")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn replace_with_stale_expectation_conflicts() {
        let directory = InMemoryUserDirectory::new();
        let user = directory.create("kakao:123").await.unwrap();

        directory
            .replace_refresh_credential(user.id, None, grant("first"))
            .await
            .unwrap();

        // A second caller still expecting no grant loses the race.
        let result = directory
            .replace_refresh_credential(user.id, None, grant("other"))
            .await;
        assert_eq!(result, Err(DirectoryError::Conflict));

        // And so does one expecting an already-rotated value.
        directory
            .replace_refresh_credential(user.id, Some("first"), grant("second"))
            .await
            .unwrap();
        let result = directory
            .replace_refresh_credential(user.id, Some("first"), grant("third"))
            .await;
        assert_eq!(result, Err(DirectoryError::Conflict));
    }

    #[tokio::test]
    async fn replace_on_unknown_record_is_not_found() {
        let directory = InMemoryUserDirectory::new();
        let result = directory
            .replace_refresh_credential(Uuid::new_v4(), None, grant("x"))
            .await;
        assert_eq!(result, Err(DirectoryError::NotFound));
    }

    #[tokio::test]
    async fn save_upserts_whole_record() {
        let directory = InMemoryUserDirectory::new();
        let mut user = directory.create("kakao:123").await.unwrap();

        user.refresh = Some(grant("fresh"));
        directory.save(user.clone()).await.unwrap();

        let found = directory
            .find_by_refresh_credential("fresh")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
    }
}
