use crate::model::Task;
use std::collections::HashSet;

/// Active and removed tasks. The two collections are disjoint by id and keep
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Store {
    pub active: Vec<Task>,
    pub removed: Vec<Task>,
}

impl Store {
    pub fn new(active: Vec<Task>, removed: Vec<Task>) -> Self {
        Self { active, removed }
    }

    pub fn find_active(&self, id: u64) -> Option<&Task> {
        self.active.iter().find(|task| task.id == id)
    }

    pub fn find_removed(&self, id: u64) -> Option<&Task> {
        self.removed.iter().find(|task| task.id == id)
    }

    pub fn max_id(&self) -> Option<u64> {
        self.active
            .iter()
            .chain(self.removed.iter())
            .map(|task| task.id)
            .max()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.removed.is_empty()
    }

    /// First id that appears more than once across both collections.
    pub fn duplicate_id(&self) -> Option<u64> {
        let mut seen = HashSet::new();
        self.active
            .iter()
            .chain(self.removed.iter())
            .map(|task| task.id)
            .find(|id| !seen.insert(*id))
    }
}
