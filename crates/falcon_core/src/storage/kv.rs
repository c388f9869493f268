use crate::error::AppError;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub const ACTIVE_KEY: &str = "myTodos";
pub const REMOVED_KEY: &str = "removedTodos";
pub const LAST_RESET_KEY: &str = "lastResetDate";

const STORE_FILE_NAME: &str = "local_storage.json";
const STORE_ENV_VAR: &str = "FALCON_STORE_PATH";

/// String-keyed, string-valued persistent storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), AppError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), AppError> {
        self.set_many(&[(key, value)])
    }
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    Ok(app_dir()?.join(STORE_FILE_NAME))
}

pub(crate) fn app_dir() -> Result<PathBuf, AppError> {
    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("falcon"))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join("falcon"))
    }
}

/// Key-value store backed by a single JSON object file. Every write
/// rewrites the whole file, so a multi-key update lands together.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, AppError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|err| AppError::io(format!("{}: {}", self.path.display(), err)))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|err| {
            AppError::invalid_data(format!("invalid JSON in {}: {}", self.path.display(), err))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        std::fs::write(&self.path, content).map_err(|err| AppError::io(err.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.path, permissions)
                .map_err(|err| AppError::io(err.to_string()))?;
        }

        log::debug!("wrote {} keys to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), AppError> {
        let mut all = self.read_all()?;
        for (key, value) in entries {
            all.insert((*key).to_string(), value.clone());
        }
        self.write_all(&all)
    }
}

/// In-process store, used when nothing should touch the disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), AppError> {
        for (key, value) in entries {
            self.entries.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ACTIVE_KEY, JsonFileStore, KeyValueStore, REMOVED_KEY};
    use std::fs;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert_eq!(store.get(ACTIVE_KEY).unwrap(), None);
    }

    #[test]
    fn set_many_writes_all_keys_in_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("local.json");
        let mut store = JsonFileStore::new(&path);

        store
            .set_many(&[(ACTIVE_KEY, "[]".to_string()), (REMOVED_KEY, "[1]".to_string())])
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get(ACTIVE_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(reopened.get(REMOVED_KEY).unwrap().as_deref(), Some("[1]"));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw[ACTIVE_KEY], "[]");
    }

    #[cfg(unix)]
    #[test]
    fn file_is_private_to_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        let mut store = JsonFileStore::new(&path);
        store.set(ACTIVE_KEY, "[]".to_string()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn corrupt_file_is_invalid_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).get(ACTIVE_KEY).unwrap_err();
        assert_eq!(err.code(), "invalid_data");
    }
}
