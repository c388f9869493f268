use time::{Date, Weekday};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub due_date: Option<Date>,
    /// Weekdays on which the task recurs, deduplicated, Sunday first.
    pub repeat_days: Vec<Weekday>,
    /// The day the task was marked done. `None` means not completed.
    pub completed_on: Option<Date>,
}

impl Task {
    pub fn is_recurring(&self) -> bool {
        !self.repeat_days.is_empty()
    }

    pub fn repeats_on(&self, weekday: Weekday) -> bool {
        self.repeat_days.contains(&weekday)
    }

    pub fn is_unscheduled(&self) -> bool {
        self.due_date.is_none() && self.repeat_days.is_empty()
    }
}

/// Input for the add operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub due_date: Option<Date>,
    pub repeat_days: Vec<Weekday>,
}
