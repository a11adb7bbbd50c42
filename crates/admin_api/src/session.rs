use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{Context, Result};
use base::entities::{AccessToken, RefreshToken};
use serde::{Deserialize, Serialize};

use crate::session::storage::SessionStorage;

pub mod storage;

pub type UserId = String;
pub type Role = String;

/// The persisted mirror of a session, in the shape the backend returns on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user_id: UserId,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Vec<Role>,
    #[serde(default)]
    pub profile_image: Option<String>,
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: AccessToken,
    #[serde(default)]
    pub refresh_token: Option<RefreshToken>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub roles: BTreeSet<Role>,
}

impl From<&SessionRecord> for Session {
    fn from(record: &SessionRecord) -> Self {
        Self {
            access_token: record.access_token.clone(),
            refresh_token: record.refresh_token.clone(),
            roles: record.role.iter().cloned().collect(),
        }
    }
}

/// Holds the single active session and keeps its persisted mirror in sync.
///
/// Every write goes to the storage first and only then replaces the in-memory
/// record, so a failed write leaves the previous session in effect.
///
/// The context also owns the refresh lock, so token refreshes stay serialized
/// across every client sharing it.
pub struct SessionContext {
    current: RwLock<Option<SessionRecord>>,
    storage: Box<dyn SessionStorage + Send + Sync>,
    refresh_lock: Mutex<()>,
}

impl SessionContext {
    pub fn new(storage: Box<dyn SessionStorage + Send + Sync>) -> Self {
        Self {
            current: RwLock::new(None),
            storage,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Creates a context initialised from whatever the storage holds.
    pub fn restore(storage: Box<dyn SessionStorage + Send + Sync>) -> Result<Self> {
        let record = storage
            .load()
            .context("an error occurred on restoring a session")?;

        Ok(Self {
            current: RwLock::new(record),
            storage,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn start(&self, record: SessionRecord) -> Result<()> {
        self.storage
            .save(&record)
            .context("an error occurred on persisting a new session")?;
        *self.write() = Some(record);
        Ok(())
    }

    pub fn update(&self, tokens: TokenPair) -> Result<()> {
        let mut current = self.write();

        let mut record = current
            .clone()
            .context("there is no active session to update tokens of")?;

        record.access_token = tokens.access_token;
        if let Some(refresh_token) = tokens.refresh_token {
            record.refresh_token = refresh_token;
        }

        self.storage
            .save(&record)
            .context("an error occurred on persisting refreshed tokens")?;
        *current = Some(record);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let mut current = self.write();
        self.storage
            .clear()
            .context("an error occurred on clearing a persisted session")?;
        *current = None;
        Ok(())
    }

    pub fn session(&self) -> Option<Session> {
        self.read().as_ref().map(Session::from)
    }

    pub fn access_token(&self) -> Option<AccessToken> {
        self.read()
            .as_ref()
            .map(|record| record.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<RefreshToken> {
        self.read()
            .as_ref()
            .map(|record| record.refresh_token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        self.read().as_ref().map_or(false, |record| {
            record
                .role
                .iter()
                .any(|role| roles.contains(&role.as_str()))
        })
    }

    /// Held for the whole check-then-refresh sequence of a rejected token.
    pub fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<SessionRecord>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<SessionRecord>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}
