//! Derives the visible task lists and the dashboard summary from a store.

use crate::evaluator::{in_scope_window, is_done_today, is_due_today};
use crate::model::{Scope, Store, Task, ViewMode};
use time::Date;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub scope: Scope,
    pub pending: usize,
    pub completed: usize,
}

pub fn visible_tasks(store: &Store, view: ViewMode, today: Date) -> Vec<Task> {
    match view {
        ViewMode::Removed => store.removed.clone(),
        other => store
            .active
            .iter()
            .filter(|task| matches_view(task, other, today))
            .cloned()
            .collect(),
    }
}

fn matches_view(task: &Task, view: ViewMode, today: Date) -> bool {
    match view {
        ViewMode::Pending => is_due_today(task, today) && !is_done_today(task, today),
        ViewMode::Done => is_done_today(task, today),
        ViewMode::Scheduled => is_scheduled(task, today),
        ViewMode::Removed => false,
    }
}

/// Recurring undated tasks not done today, plus tasks dated in the future that
/// were not already completed on that date.
fn is_scheduled(task: &Task, today: Date) -> bool {
    let recurring_open =
        task.is_recurring() && !is_done_today(task, today) && task.due_date.is_none();
    let upcoming = match task.due_date {
        Some(due) => due > today && task.completed_on != Some(due),
        None => false,
    };
    recurring_open || upcoming
}

/// Counts active tasks inside the scope window, split on whether a
/// completion date is recorded at all.
pub fn summarize(store: &Store, scope: Scope, today: Date) -> Summary {
    let mut summary = Summary {
        scope,
        ..Summary::default()
    };

    for task in store
        .active
        .iter()
        .filter(|task| in_scope_window(task, scope, today))
    {
        if task.completed_on.is_some() {
            summary.completed += 1;
        } else {
            summary.pending += 1;
        }
    }

    summary
}
