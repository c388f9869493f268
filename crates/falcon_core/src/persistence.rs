//! Moves a [`Store`] between local storage, the fallback snapshot and
//! exported or imported files.

use crate::calendar::{format_date, parse_date};
use crate::error::AppError;
use crate::model::{Store, Task};
use crate::storage::kv::{ACTIVE_KEY, KeyValueStore, LAST_RESET_KEY, REMOVED_KEY};
use crate::storage::snapshot::{Snapshot, SnapshotSource};
use crate::storage::wire::{CompletionRule, TaskRecord, records_from_tasks, tasks_from_records};
use std::path::Path;
use time::Date;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    LocalStorage,
    Fallback,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded {
    pub store: Store,
    pub last_reset: Option<Date>,
    pub origin: LoadOrigin,
}

/// Reads local storage. When it holds no active list, the fallback source is
/// consulted once; a failing fallback is logged and yields an empty store.
pub fn load<K, S>(local: &K, fallback: &S, today: Date) -> Result<Loaded, AppError>
where
    K: KeyValueStore + ?Sized,
    S: SnapshotSource + ?Sized,
{
    let stored_active = local.get(ACTIVE_KEY)?;
    let stored_removed = local.get(REMOVED_KEY)?;
    let last_reset = match local.get(LAST_RESET_KEY)? {
        Some(raw) => match parse_date(&raw) {
            Ok(date) => Some(date),
            Err(_) => {
                log::warn!("ignoring malformed {LAST_RESET_KEY} value '{raw}'");
                None
            }
        },
        None => None,
    };

    let (mut store, origin) = match stored_active {
        Some(raw) => (
            Store::new(decode_tasks(ACTIVE_KEY, &raw, today)?, Vec::new()),
            LoadOrigin::LocalStorage,
        ),
        None => match fallback.fetch() {
            Ok(Some(snapshot)) => match snapshot.into_store(today, CompletionRule::Stored) {
                Ok(store) => {
                    log::debug!("loaded {} tasks from fallback snapshot", store.active.len());
                    (store, LoadOrigin::Fallback)
                }
                Err(err) => {
                    log::warn!("fallback snapshot load failed: {err}");
                    (Store::default(), LoadOrigin::Empty)
                }
            },
            Ok(None) => (Store::default(), LoadOrigin::Empty),
            Err(err) => {
                log::warn!("fallback snapshot load failed: {err}");
                (Store::default(), LoadOrigin::Empty)
            }
        },
    };

    if let Some(raw) = stored_removed {
        store.removed = decode_tasks(REMOVED_KEY, &raw, today)?;
    }
    if let Some(id) = store.duplicate_id() {
        return Err(AppError::invalid_data(format!(
            "local storage holds task id {id} more than once"
        )));
    }

    Ok(Loaded {
        store,
        last_reset,
        origin,
    })
}

fn decode_tasks(key: &str, raw: &str, today: Date) -> Result<Vec<Task>, AppError> {
    let records: Vec<TaskRecord> = serde_json::from_str(raw)
        .map_err(|err| AppError::invalid_data(format!("local storage key {key}: {err}")))?;
    tasks_from_records(records, today, CompletionRule::Stored)
}

/// Writes both collections to local storage in one update.
pub fn save_local<K>(local: &mut K, store: &Store) -> Result<(), AppError>
where
    K: KeyValueStore + ?Sized,
{
    let active = encode_tasks(&store.active)?;
    let removed = encode_tasks(&store.removed)?;
    local.set_many(&[(ACTIVE_KEY, active), (REMOVED_KEY, removed)])
}

pub fn save_last_reset<K>(local: &mut K, date: Date) -> Result<(), AppError>
where
    K: KeyValueStore + ?Sized,
{
    local.set(LAST_RESET_KEY, format_date(date))
}

fn encode_tasks(tasks: &[Task]) -> Result<String, AppError> {
    serde_json::to_string(&records_from_tasks(tasks))
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Writes the downloadable `{ todos, removedTodos }` document.
pub fn export_file(path: &Path, store: &Store) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    let content = Snapshot::from_store(store).to_json_pretty()?;
    std::fs::write(path, content)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    log::info!("exported {} tasks to {}", store.active.len(), path.display());
    Ok(())
}

/// Parses an imported document and normalises each active task's completion
/// for `today`. Any failure is a parse error and produces no store.
pub fn import_bytes(bytes: &[u8], today: Date) -> Result<Store, AppError> {
    let content = std::str::from_utf8(bytes)
        .map_err(|err| AppError::parse(format!("file is not UTF-8: {err}")))?;
    let snapshot = Snapshot::from_json(content)?;
    snapshot
        .into_store(today, CompletionRule::Import)
        .map_err(|err| AppError::parse(err.message()))
}

pub fn import_file(path: &Path, today: Date) -> Result<Store, AppError> {
    let bytes =
        std::fs::read(path).map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let store = import_bytes(&bytes, today)?;
    log::info!(
        "imported {} active and {} removed tasks from {}",
        store.active.len(),
        store.removed.len(),
        path.display()
    );
    Ok(store)
}
