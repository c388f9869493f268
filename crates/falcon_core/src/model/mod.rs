mod store;
mod task;

pub use store::Store;
pub use task::{NewTask, Task};

use crate::error::AppError;
use std::fmt;
use std::str::FromStr;

/// Time window used for the dashboard summary counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Scope {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Scope {
    pub const ALL: [Scope; 4] = [Scope::Daily, Scope::Weekly, Scope::Monthly, Scope::Yearly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "yearly" | "year" => Ok(Self::Yearly),
            other => Err(AppError::invalid_input(format!("unknown scope '{other}'"))),
        }
    }
}

/// The display filter selecting one of the four task lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Pending,
    Done,
    Scheduled,
    Removed,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Scheduled => "scheduled",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" | "todo" => Ok(Self::Pending),
            "done" | "completed" => Ok(Self::Done),
            "scheduled" => Ok(Self::Scheduled),
            "removed" | "trash" => Ok(Self::Removed),
            other => Err(AppError::invalid_input(format!("unknown view '{other}'"))),
        }
    }
}
