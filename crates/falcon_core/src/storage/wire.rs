//! JSON shape of a task as it is kept in local storage and in exported files.
//!
//! ```json
//! { "id": 1712345678901, "task": "Pay rent", "date": "2024-04-01",
//!   "repeatDays": ["Mon"], "done": "2024-04-15" }
//! ```
//!
//! `done` is written as an empty string or a date. Older files carry a
//! boolean there, which is still accepted on read.

use crate::calendar::{format_date, normalize_weekdays, parse_date, parse_weekday, weekday_name};
use crate::error::AppError;
use crate::model::Task;
use serde::{Deserialize, Serialize};
use time::Date;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: u64,
    #[serde(rename = "task")]
    pub title: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default, rename = "repeatDays")]
    pub repeat_days: Vec<String>,
    #[serde(default)]
    pub done: Option<DoneValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DoneValue {
    Flag(bool),
    Date(String),
}

/// How a stored `done` value becomes a completion date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionRule {
    /// Keep the recorded date; a legacy `true` means done today.
    Stored,
    /// As `Stored`, then drop any completion that is not today's, so a stale
    /// flag from an earlier day does not come in as done.
    Import,
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            date: Some(task.due_date.map(format_date).unwrap_or_default()),
            repeat_days: task
                .repeat_days
                .iter()
                .map(|day| weekday_name(*day).to_string())
                .collect(),
            done: Some(DoneValue::Date(
                task.completed_on.map(format_date).unwrap_or_default(),
            )),
        }
    }
}

impl TaskRecord {
    pub fn into_task(self, today: Date, rule: CompletionRule) -> Result<Task, AppError> {
        let due_date = match self.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date(raw).map_err(|_| {
                AppError::invalid_data(format!("task {}: invalid date '{raw}'", self.id))
            })?),
        };

        let mut repeat_days = Vec::with_capacity(self.repeat_days.len());
        for raw in &self.repeat_days {
            let day = parse_weekday(raw).map_err(|_| {
                AppError::invalid_data(format!("task {}: invalid repeat day '{raw}'", self.id))
            })?;
            repeat_days.push(day);
        }

        let completed_on = match self.done {
            None | Some(DoneValue::Flag(false)) => None,
            Some(DoneValue::Flag(true)) => Some(today),
            Some(DoneValue::Date(raw)) if raw.trim().is_empty() => None,
            Some(DoneValue::Date(raw)) => Some(parse_date(&raw).map_err(|_| {
                AppError::invalid_data(format!("task {}: invalid done date '{raw}'", self.id))
            })?),
        };

        let completed_on = match rule {
            CompletionRule::Stored => completed_on,
            CompletionRule::Import => completed_on.filter(|done| *done == today),
        };

        Ok(Task {
            id: self.id,
            title: self.title,
            due_date,
            repeat_days: normalize_weekdays(repeat_days),
            completed_on,
        })
    }
}

pub fn records_from_tasks(tasks: &[Task]) -> Vec<TaskRecord> {
    tasks.iter().map(TaskRecord::from).collect()
}

pub fn tasks_from_records(
    records: Vec<TaskRecord>,
    today: Date,
    rule: CompletionRule,
) -> Result<Vec<Task>, AppError> {
    records
        .into_iter()
        .map(|record| record.into_task(today, rule))
        .collect()
}
