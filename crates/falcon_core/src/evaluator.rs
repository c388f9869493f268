//! Pure date and recurrence checks for a single task against a reference day.

use crate::model::{Scope, Task};
use time::Date;

pub fn is_due_today(task: &Task, today: Date) -> bool {
    task.repeats_on(today.weekday()) || task.due_date == Some(today)
}

pub fn is_done_today(task: &Task, today: Date) -> bool {
    task.completed_on == Some(today)
}

/// Whether the task counts towards the summary for `scope`.
///
/// The effective date is the due date, or `today` for purely recurring
/// tasks. Tasks with neither a due date nor repeat days are never in scope.
pub fn in_scope_window(task: &Task, scope: Scope, today: Date) -> bool {
    if task.is_unscheduled() {
        return false;
    }

    let effective = task.due_date.unwrap_or(today);
    match scope {
        Scope::Daily => is_due_today(task, today),
        Scope::Weekly => {
            let elapsed = (today - effective).whole_days();
            (0..=7).contains(&elapsed)
        }
        Scope::Monthly => {
            effective.year() == today.year()
                && effective.month() == today.month()
                && effective <= today
        }
        Scope::Yearly => effective.year() == today.year() && effective <= today,
    }
}
