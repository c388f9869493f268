use crate::error::AppError;
use crate::model::Store;
use crate::storage::kv::app_dir;
use crate::storage::wire::{CompletionRule, TaskRecord, records_from_tasks, tasks_from_records};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::Date;

pub const SNAPSHOT_FILE_NAME: &str = "my-todos.json";
const FALLBACK_ENV_VAR: &str = "FALCON_FALLBACK_PATH";

/// `{ "todos": [...], "removedTodos": [...] }`, the layout of the bundled
/// fallback file and of exported and imported files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub todos: Vec<TaskRecord>,
    #[serde(default, rename = "removedTodos")]
    pub removed_todos: Vec<TaskRecord>,
}

impl Snapshot {
    pub fn from_store(store: &Store) -> Self {
        Self {
            todos: records_from_tasks(&store.active),
            removed_todos: records_from_tasks(&store.removed),
        }
    }

    /// Active tasks follow `rule`; removed tasks always keep their stored
    /// completion. Ids must be unique across both lists.
    pub fn into_store(self, today: Date, rule: CompletionRule) -> Result<Store, AppError> {
        let active = tasks_from_records(self.todos, today, rule)?;
        let removed = tasks_from_records(self.removed_todos, today, CompletionRule::Stored)?;
        let store = Store::new(active, removed);
        if let Some(id) = store.duplicate_id() {
            return Err(AppError::invalid_data(format!("duplicate task id {id}")));
        }
        Ok(store)
    }

    pub fn from_json(content: &str) -> Result<Self, AppError> {
        serde_json::from_str(content).map_err(|err| AppError::parse(err.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, AppError> {
        serde_json::to_string_pretty(self).map_err(|err| AppError::invalid_data(err.to_string()))
    }
}

/// Where the initial state comes from when local storage holds nothing.
pub trait SnapshotSource {
    fn fetch(&self) -> Result<Option<Snapshot>, AppError>;
}

impl SnapshotSource for Snapshot {
    fn fetch(&self) -> Result<Option<Snapshot>, AppError> {
        Ok(Some(self.clone()))
    }
}

/// No fallback at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSnapshot;

impl SnapshotSource for NoSnapshot {
    fn fetch(&self) -> Result<Option<Snapshot>, AppError> {
        Ok(None)
    }
}

/// A snapshot file on disk. A missing file is not an error.
#[derive(Debug, Clone)]
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for FileSnapshot {
    fn fetch(&self) -> Result<Option<Snapshot>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|err| AppError::io(format!("{}: {}", self.path.display(), err)))?;
        Snapshot::from_json(&content).map(Some)
    }
}

/// Resolves the fallback snapshot: env var, then the configured path, then
/// `my-todos.json` in the application directory.
pub fn fallback_path(configured: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(FALLBACK_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if let Some(path) = configured {
        return Ok(path.to_path_buf());
    }

    Ok(app_dir()?.join(SNAPSHOT_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::{FileSnapshot, NoSnapshot, Snapshot, SnapshotSource};
    use crate::storage::wire::CompletionRule;
    use std::fs;
    use time::macros::date;

    #[test]
    fn missing_keys_default_to_empty_lists() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert!(snapshot.todos.is_empty());
        assert!(snapshot.removed_todos.is_empty());
    }

    #[test]
    fn wrong_shape_is_parse_error() {
        assert_eq!(Snapshot::from_json("[1, 2]").unwrap_err().code(), "parse_error");
        assert_eq!(
            Snapshot::from_json(r#"{"todos": "nope"}"#).unwrap_err().code(),
            "parse_error"
        );
        assert_eq!(Snapshot::from_json("{").unwrap_err().code(), "parse_error");
    }

    #[test]
    fn removed_tasks_keep_stored_completion_on_import() {
        let snapshot = Snapshot::from_json(
            r#"{
                "todos": [],
                "removedTodos": [
                    { "id": 2, "task": "old", "date": "2024-04-15", "repeatDays": [], "done": "2024-04-10" }
                ]
            }"#,
        )
        .unwrap();

        let store = snapshot
            .into_store(date!(2024 - 04 - 15), CompletionRule::Import)
            .unwrap();
        assert_eq!(store.removed[0].completed_on, Some(date!(2024 - 04 - 10)));
    }

    #[test]
    fn file_snapshot_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my-todos.json");
        fs::write(
            &path,
            r#"{ "todos": [{ "id": 1, "task": "seed", "date": "", "repeatDays": ["Mon"], "done": "" }] }"#,
        )
        .unwrap();

        let snapshot = FileSnapshot::new(&path).fetch().unwrap().unwrap();
        assert_eq!(snapshot.todos.len(), 1);
        assert_eq!(snapshot.todos[0].title, "seed");
    }

    #[test]
    fn absent_sources_yield_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileSnapshot::new(dir.path().join("none.json")).fetch().unwrap().is_none());
        assert!(NoSnapshot.fetch().unwrap().is_none());
    }
}
