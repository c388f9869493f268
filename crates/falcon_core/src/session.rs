use crate::calendar::now_millis;
use crate::config::Config;
use crate::error::AppError;
use crate::model::{NewTask, Scope, Store, Task, ViewMode};
use crate::persistence::{self, LoadOrigin};
use crate::reducer;
use crate::storage::kv::{self, JsonFileStore, KeyValueStore};
use crate::storage::snapshot::{self, FileSnapshot, SnapshotSource};
use crate::view::{self, Summary};
use std::path::Path;
use time::Date;

/// Session over the on-disk local store and fallback snapshot.
pub type LocalSession = Session<JsonFileStore>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOutcome {
    pub active: usize,
    pub removed: usize,
}

/// The loaded store plus the collaborators it is persisted through.
///
/// Every mutation runs a reducer and writes both task lists back to local
/// storage before returning. `has_unsaved_changes` tracks whether the state
/// has changed since the last export or import.
pub struct Session<K> {
    local: K,
    store: Store,
    today: Date,
    last_reset: Date,
    origin: LoadOrigin,
    unsaved: bool,
}

pub fn open_local(config: &Config, today: Date) -> Result<LocalSession, AppError> {
    let local = JsonFileStore::new(kv::store_path()?);
    let fallback = FileSnapshot::new(snapshot::fallback_path(config.fallback_path.as_deref())?);
    Session::open(local, &fallback, today)
}

impl<K> Session<K>
where
    K: KeyValueStore,
{
    /// Loads state and applies any daily reset missed since the last run.
    pub fn open<S>(mut local: K, fallback: &S, today: Date) -> Result<Self, AppError>
    where
        S: SnapshotSource + ?Sized,
    {
        let loaded = persistence::load(&local, fallback, today)?;
        let (store, last_reset) =
            reducer::reconcile_daily_reset(&loaded.store, loaded.last_reset, today);

        if store != loaded.store {
            log::debug!("applied missed daily reset up to {today}");
            persistence::save_local(&mut local, &store)?;
        }
        if loaded.last_reset != Some(last_reset) {
            persistence::save_last_reset(&mut local, last_reset)?;
        }

        Ok(Self {
            local,
            store,
            today,
            last_reset,
            origin: loaded.origin,
            unsaved: false,
        })
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn today(&self) -> Date {
        self.today
    }

    pub fn origin(&self) -> LoadOrigin {
        self.origin
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Moves the session to a new local day, running the daily reset for
    /// every day crossed. Returns whether the day changed.
    pub fn roll_over(&mut self, today: Date) -> Result<bool, AppError> {
        if today <= self.today {
            return Ok(false);
        }

        let (store, last_reset) =
            reducer::reconcile_daily_reset(&self.store, Some(self.last_reset), today);
        if store != self.store {
            persistence::save_local(&mut self.local, &store)?;
            self.store = store;
            self.unsaved = true;
        }
        persistence::save_last_reset(&mut self.local, last_reset)?;
        self.last_reset = last_reset;
        self.today = today;
        log::debug!("rolled over to {today}");
        Ok(true)
    }

    pub fn visible(&self, view: ViewMode) -> Vec<Task> {
        view::visible_tasks(&self.store, view, self.today)
    }

    pub fn summary(&self, scope: Scope) -> Summary {
        view::summarize(&self.store, scope, self.today)
    }

    pub fn add_task(&mut self, new_task: NewTask) -> Result<Task, AppError> {
        if new_task.title.trim().is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }

        let next = reducer::add(&self.store, new_task, now_millis());
        let added = next
            .active
            .last()
            .cloned()
            .ok_or_else(|| AppError::invalid_data("task was not added"))?;
        self.commit(next)?;
        Ok(added)
    }

    pub fn toggle_done(&mut self, id: u64) -> Result<Task, AppError> {
        require_active(&self.store, id)?;
        let next = reducer::toggle_done(&self.store, id, self.today);
        let updated = require_active(&next, id)?.clone();
        self.commit(next)?;
        Ok(updated)
    }

    pub fn remove(&mut self, id: u64) -> Result<Task, AppError> {
        let task = require_active(&self.store, id)?.clone();
        let next = reducer::remove(&self.store, id);
        self.commit(next)?;
        Ok(task)
    }

    pub fn restore(&mut self, id: u64) -> Result<Task, AppError> {
        let task = require_removed(&self.store, id)?.clone();
        let next = reducer::restore(&self.store, id);
        self.commit(next)?;
        Ok(task)
    }

    pub fn delete_forever(&mut self, id: u64) -> Result<Task, AppError> {
        let task = require_removed(&self.store, id)?.clone();
        let next = reducer::delete_forever(&self.store, id);
        self.commit(next)?;
        Ok(task)
    }

    pub fn clear_schedule(&mut self, id: u64) -> Result<Task, AppError> {
        require_active(&self.store, id)?;
        let next = reducer::clear_schedule(&self.store, id);
        let updated = require_active(&next, id)?.clone();
        self.commit(next)?;
        Ok(updated)
    }

    /// Writes local storage and the downloadable file.
    pub fn save(&mut self, export_path: &Path) -> Result<(), AppError> {
        persistence::save_local(&mut self.local, &self.store)?;
        persistence::export_file(export_path, &self.store)?;
        self.unsaved = false;
        Ok(())
    }

    /// Replaces the whole state with an imported file. On any error the
    /// current state is left untouched.
    pub fn import_file(&mut self, path: &Path) -> Result<ImportOutcome, AppError> {
        let imported = persistence::import_file(path, self.today)?;
        persistence::save_local(&mut self.local, &imported)?;
        persistence::save_last_reset(&mut self.local, self.today)?;

        let outcome = ImportOutcome {
            active: imported.active.len(),
            removed: imported.removed.len(),
        };
        self.store = imported;
        self.last_reset = self.today;
        self.unsaved = false;
        Ok(outcome)
    }

    fn commit(&mut self, next: Store) -> Result<(), AppError> {
        persistence::save_local(&mut self.local, &next)?;
        self.store = next;
        self.unsaved = true;
        Ok(())
    }
}

fn require_active(store: &Store, id: u64) -> Result<&Task, AppError> {
    store
        .find_active(id)
        .ok_or_else(|| AppError::invalid_input("task not found"))
}

fn require_removed(store: &Store, id: u64) -> Result<&Task, AppError> {
    store
        .find_removed(id)
        .ok_or_else(|| AppError::invalid_input("removed task not found"))
}
