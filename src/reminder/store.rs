use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::reminder::Reminder;

pub const REMINDERS_KEY: &str = "reminders_webapp";
pub const CATEGORIES_KEY: &str = "reminders_categories";

pub trait Storage {
    fn read(&self, key: &str) -> io::Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)
    }
}

/// Read a JSON array stored under `key`. Anything missing, unreadable or
/// malformed comes back empty.
pub fn read_list<T: DeserializeOwned>(storage: &impl Storage, key: &str) -> Vec<T> {
    let content = match storage.read(key) {
        Ok(Some(content)) => content,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(key, "storage read failed: {}", err);
            return Vec::new();
        }
    };
    serde_json::from_str(&content).unwrap_or_else(|err| {
        warn!(key, "discarding malformed stored data: {}", err);
        Vec::new()
    })
}

pub fn write_list<T: Serialize>(storage: &mut impl Storage, key: &str, items: &[T]) {
    let json = match serde_json::to_string(items) {
        Ok(json) => json,
        Err(err) => {
            warn!(key, "failed to serialize: {}", err);
            return;
        }
    };
    if let Err(err) = storage.write(key, &json) {
        warn!(key, "storage write failed: {}", err);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("A reminder with id {0} already exists")]
    DuplicateId(String),
    #[error("Reminder {0} not found")]
    NotFound(String),
}

pub struct ReminderStore<S: Storage> {
    storage: S,
    reminders: Vec<Reminder>,
}

impl<S: Storage> ReminderStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            reminders: Vec::new(),
        }
    }

    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.load();
        store
    }

    pub fn load(&mut self) -> &[Reminder] {
        self.reminders = read_list(&self.storage, REMINDERS_KEY);
        debug!(count = self.reminders.len(), "loaded reminders");
        &self.reminders
    }

    pub fn all(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn find(&self, id: &str) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    pub fn add(&mut self, reminder: Reminder) -> Result<(), StoreError> {
        if self.find(&reminder.id).is_some() {
            return Err(StoreError::DuplicateId(reminder.id));
        }
        self.reminders.push(reminder);
        self.persist();
        Ok(())
    }

    /// Replace every field of the reminder with `id`. The id itself stays.
    pub fn update(&mut self, id: &str, mut reminder: Reminder) -> Result<(), StoreError> {
        let slot = self
            .reminders
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        reminder.id = slot.id.clone();
        *slot = reminder;
        self.persist();
        Ok(())
    }

    pub fn remove(&mut self, id: &str) -> Result<Reminder, StoreError> {
        let idx = self
            .reminders
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let removed = self.reminders.remove(idx);
        self.persist();
        Ok(removed)
    }

    fn persist(&mut self) {
        write_list(&mut self.storage, REMINDERS_KEY, &self.reminders);
    }

    #[cfg(test)]
    pub(crate) fn into_storage(self) -> S {
        self.storage
    }
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct MemoryStorage {
    entries: std::collections::HashMap<String, String>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn read(&self, key: &str) -> io::Result<Option<String>> {
        if self.fail_reads {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "unreadable"));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reminder::reminder::sample;

    #[test]
    fn added_reminder_survives_reload() {
        let mut store = ReminderStore::new(MemoryStorage::default());
        let mut r = sample("1", "2025-06-03T09:00:00Z", "Work");
        r.note = Some("agenda".into());
        store.add(r.clone()).unwrap();

        let reloaded = ReminderStore::open(store.into_storage());
        assert_eq!(reloaded.all(), &[r]);
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ReminderStore::open(FileStorage::new(dir.path().join("data")));
        assert!(store.all().is_empty());
        let r = sample("1", "2025-06-03T09:00:00Z", "");
        store.add(r.clone()).unwrap();

        let mut reopened = ReminderStore::new(FileStorage::new(dir.path().join("data")));
        assert_eq!(reopened.load(), &[r]);
        assert!(dir.path().join("data").join("reminders_webapp.json").exists());
    }

    #[test]
    fn corrupt_data_loads_empty() {
        let mut storage = MemoryStorage::default();
        storage.write(REMINDERS_KEY, "{not json").unwrap();
        let store = ReminderStore::open(storage);
        assert!(store.all().is_empty());
    }

    #[test]
    fn unreadable_storage_loads_empty() {
        let mut storage = MemoryStorage::default();
        storage
            .write(REMINDERS_KEY, r#"[{"id":"1","title":"x","datetime":"2025-06-03T09:00:00Z"}]"#)
            .unwrap();
        storage.fail_reads = true;
        let store = ReminderStore::open(storage);
        assert!(store.all().is_empty());
    }

    #[test]
    fn duplicate_ids_are_refused() {
        let mut store = ReminderStore::new(MemoryStorage::default());
        store.add(sample("1", "2025-06-03T09:00:00Z", "")).unwrap();
        assert_eq!(
            store.add(sample("1", "2025-06-04T09:00:00Z", "")),
            Err(StoreError::DuplicateId("1".into()))
        );
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn update_replaces_in_place_and_keeps_id() {
        let mut store = ReminderStore::new(MemoryStorage::default());
        store.add(sample("1", "2025-06-03T09:00:00Z", "")).unwrap();
        store.add(sample("2", "2025-06-04T09:00:00Z", "")).unwrap();

        let mut patch = sample("ignored", "2025-07-01T12:00:00Z", "Home");
        patch.title = "Renamed".into();
        store.update("1", patch).unwrap();

        let ids: Vec<_> = store.all().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(store.find("1").unwrap().title, "Renamed");
        assert_eq!(store.find("1").unwrap().category, "Home");
        assert_eq!(
            store.update("9", sample("9", "2025-07-01T12:00:00Z", "")),
            Err(StoreError::NotFound("9".into()))
        );
    }

    #[test]
    fn remove_persists() {
        let mut store = ReminderStore::new(MemoryStorage::default());
        store.add(sample("1", "2025-06-03T09:00:00Z", "")).unwrap();
        assert_eq!(store.remove("1").unwrap().id, "1");
        assert!(store.remove("1").is_err());
        let reloaded = ReminderStore::open(store.into_storage());
        assert!(reloaded.all().is_empty());
    }

    #[test]
    fn write_failures_keep_memory_state() {
        let storage = MemoryStorage {
            fail_writes: true,
            ..MemoryStorage::default()
        };
        let mut store = ReminderStore::new(storage);
        store.add(sample("1", "2025-06-03T09:00:00Z", "")).unwrap();
        assert_eq!(store.all().len(), 1);
    }
}
