use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};

use crate::session::SessionRecord;

/// Storage key the session record is persisted under.
pub const SESSION_STORAGE_KEY: &str = "admin_session";

pub trait SessionStorage {
    fn load(&self) -> Result<Option<SessionRecord>>;
    fn save(&self, record: &SessionRecord) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

impl<T: SessionStorage + ?Sized> SessionStorage for Arc<T> {
    fn load(&self) -> Result<Option<SessionRecord>> {
        (**self).load()
    }

    fn save(&self, record: &SessionRecord) -> Result<()> {
        (**self).save(record)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// Keeps the session record as `<dir>/admin_session.json`.
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            path: dir
                .as_ref()
                .join(format!("{}.json", SESSION_STORAGE_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    fn load(&self) -> Result<Option<SessionRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).context(format!(
            "an error occurred on reading a session file {}",
            self.path.display()
        ))?;

        let record = serde_json::from_str(&content).context(format!(
            "an error occurred on deserializing a session file {}",
            self.path.display()
        ))?;

        Ok(Some(record))
    }

    fn save(&self, record: &SessionRecord) -> Result<()> {
        let content = serde_json::to_string_pretty(record)
            .context("an error occurred on serializing a session")?;

        fs::write(&self.path, content).context(format!(
            "an error occurred on writing a session file {}",
            self.path.display()
        ))
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context(format!(
                "an error occurred on removing a session file {}",
                self.path.display()
            ))?;
        }

        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySessionStorage {
    record: Mutex<Option<SessionRecord>>,
}

impl InMemorySessionStorage {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_record(record: SessionRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }

    pub fn stored(&self) -> Option<SessionRecord> {
        self.record
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl SessionStorage for InMemorySessionStorage {
    fn load(&self) -> Result<Option<SessionRecord>> {
        Ok(self.stored())
    }

    fn save(&self, record: &SessionRecord) -> Result<()> {
        *self.record.lock().unwrap_or_else(|e| e.into_inner()) = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.record.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::test_record;

    #[test]
    fn should_return_none_when_session_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path());

        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn should_save_and_clear_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path());
        let record = test_record("T1", "R1");

        storage.save(&record).unwrap();

        assert_eq!(storage.path(), dir.path().join("admin_session.json"));
        assert_eq!(storage.load().unwrap(), Some(record));

        storage.clear().unwrap();

        assert!(!storage.path().exists());
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn should_store_record_with_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path());

        storage.save(&test_record("T1", "R1")).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(storage.path()).unwrap()).unwrap();

        assert_eq!(raw["accessToken"], "T1");
        assert_eq!(raw["refreshToken"], "R1");
        assert_eq!(raw["userId"], "u-1");
        assert_eq!(raw["role"], serde_json::json!(["admin"]));
        assert!(raw.get("profileImage").is_some());
    }

    #[test]
    fn should_fail_on_corrupted_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileSessionStorage::new(dir.path());
        fs::write(storage.path(), "{ not a session").unwrap();

        assert!(storage.load().is_err());
    }
}
