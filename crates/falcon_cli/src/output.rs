//! Plain and JSON renderings of tasks and summaries.

use falcon_core::calendar::{format_date, weekday_name};
use falcon_core::config::Palette;
use falcon_core::error::AppError;
use falcon_core::model::{Task, ViewMode};
use falcon_core::storage::wire::TaskRecord;
use falcon_core::view::Summary;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub const FALLBACK_BEGIN: &str = "----- copy below -----";
pub const FALLBACK_END: &str = "----- copy above -----";

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Task")]
    title: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Repeats")]
    repeats: String,
    #[tabled(rename = "Done")]
    done: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        let repeats = task
            .repeat_days
            .iter()
            .map(|day| weekday_name(*day))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: task.id,
            title: task.title.clone(),
            date: task.due_date.map(format_date).unwrap_or_else(|| "-".into()),
            repeats: if repeats.is_empty() { "-".into() } else { repeats },
            done: task.completed_on.map(format_date).unwrap_or_default(),
        }
    }
}

pub fn render_tasks_plain(tasks: &[Task], view: ViewMode, palette: &Palette) -> String {
    if tasks.is_empty() {
        return format!("No {view} tasks.");
    }

    let mut table = Table::new(tasks.iter().map(TaskRow::from));
    table.with(Style::psql());
    let rendered = table.to_string();

    match view {
        ViewMode::Done | ViewMode::Removed => rendered
            .lines()
            .map(|line| palette.mutedize(line))
            .collect::<Vec<_>>()
            .join("\n"),
        ViewMode::Pending | ViewMode::Scheduled => rendered,
    }
}

pub fn task_json(task: &Task) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(TaskRecord::from(task)).map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn tasks_json(tasks: &[Task]) -> Result<serde_json::Value, AppError> {
    let payload = tasks.iter().map(task_json).collect::<Result<Vec<_>, _>>()?;
    Ok(serde_json::Value::Array(payload))
}

pub fn render_summary_plain(summary: &Summary, palette: &Palette) -> String {
    format!(
        "Scope: {}\nPending: {}\nCompleted: {}",
        palette.accentize(summary.scope.as_str()),
        summary.pending,
        summary.completed
    )
}

pub fn summary_json(summary: &Summary) -> serde_json::Value {
    serde_json::json!({
        "scope": summary.scope.as_str(),
        "pending": summary.pending,
        "completed": summary.completed,
    })
}

/// Text shown when the clipboard could not be written.
pub fn render_manual_copy(text: &str) -> String {
    format!("{FALLBACK_BEGIN}\n{text}\n{FALLBACK_END}")
}
