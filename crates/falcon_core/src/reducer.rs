//! One pure function per store mutation. Every reducer takes the current
//! store by reference and returns a new one; an unknown id or a blank title
//! yields an unchanged copy.

use crate::calendar::normalize_weekdays;
use crate::model::{NewTask, Store, Task};
use time::{Date, Duration};

/// Picks an id that is at least `candidate` and strictly greater than every
/// id already in the store.
pub fn next_id(store: &Store, candidate: u64) -> u64 {
    match store.max_id() {
        Some(max) if max >= candidate => max.saturating_add(1),
        _ => candidate,
    }
}

pub fn add(store: &Store, new_task: NewTask, id_candidate: u64) -> Store {
    let title = new_task.title.trim();
    if title.is_empty() {
        return store.clone();
    }

    let task = Task {
        id: next_id(store, id_candidate),
        title: title.to_string(),
        due_date: new_task.due_date,
        repeat_days: normalize_weekdays(new_task.repeat_days),
        completed_on: None,
    };

    let mut next = store.clone();
    next.active.push(task);
    next
}

/// Marks the task done for `today`, or clears the mark if it was already
/// done today. A completion from an earlier day is overwritten with today.
pub fn toggle_done(store: &Store, id: u64, today: Date) -> Store {
    map_active(store, id, |task| {
        task.completed_on = if task.completed_on == Some(today) {
            None
        } else {
            Some(today)
        };
    })
}

pub fn remove(store: &Store, id: u64) -> Store {
    let mut next = store.clone();
    if let Some(index) = next.active.iter().position(|task| task.id == id) {
        let task = next.active.remove(index);
        next.removed.push(task);
    }
    next
}

pub fn restore(store: &Store, id: u64) -> Store {
    let mut next = store.clone();
    if let Some(index) = next.removed.iter().position(|task| task.id == id) {
        let task = next.removed.remove(index);
        next.active.push(task);
    }
    next
}

pub fn delete_forever(store: &Store, id: u64) -> Store {
    let mut next = store.clone();
    next.removed.retain(|task| task.id != id);
    next
}

pub fn clear_schedule(store: &Store, id: u64) -> Store {
    map_active(store, id, |task| {
        task.due_date = None;
        task.repeat_days.clear();
    })
}

/// Clears the completion of every active task that recurs on the weekday of
/// `day`.
pub fn daily_reset(store: &Store, day: Date) -> Store {
    let weekday = day.weekday();
    let mut next = store.clone();
    for task in next.active.iter_mut().filter(|task| task.repeats_on(weekday)) {
        task.completed_on = None;
    }
    next
}

/// Applies the resets that were missed between `last_reset` and `today`.
///
/// Returns the new store and the date to persist as the last reset. A
/// missing or future `last_reset` only records `today`; seven consecutive
/// days cover every weekday, so older gaps collapse to the last week.
pub fn reconcile_daily_reset(
    store: &Store,
    last_reset: Option<Date>,
    today: Date,
) -> (Store, Date) {
    let Some(last_reset) = last_reset else {
        return (store.clone(), today);
    };
    if last_reset >= today {
        return (store.clone(), today);
    }

    let week_ago = today.checked_sub(Duration::days(6));
    let mut day = match (last_reset.next_day(), week_ago) {
        (Some(after_last), Some(week_ago)) => after_last.max(week_ago),
        (Some(after_last), None) => after_last,
        (None, _) => return (store.clone(), last_reset),
    };

    let mut next = store.clone();
    loop {
        next = daily_reset(&next, day);
        if day >= today {
            break;
        }
        match day.next_day() {
            Some(following) => day = following,
            None => break,
        }
    }

    (next, today)
}

fn map_active(store: &Store, id: u64, update: impl FnOnce(&mut Task)) -> Store {
    let mut next = store.clone();
    if let Some(task) = next.active.iter_mut().find(|task| task.id == id) {
        update(task);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::{
        add, clear_schedule, daily_reset, delete_forever, next_id, reconcile_daily_reset, remove,
        restore, toggle_done,
    };
    use crate::model::{NewTask, Store, Task};
    use time::macros::date;
    use time::{Date, Weekday};

    const MONDAY: Date = date!(2024 - 04 - 15);

    fn task(id: u64, repeat: &[Weekday], done: Option<Date>) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            due_date: None,
            repeat_days: repeat.to_vec(),
            completed_on: done,
        }
    }

    #[test]
    fn add_appends_trimmed_task() {
        let store = Store::default();
        let next = add(
            &store,
            NewTask {
                title: "  Pay rent ".to_string(),
                due_date: Some(date!(2024 - 04 - 01)),
                repeat_days: vec![Weekday::Friday, Weekday::Monday],
            },
            100,
        );

        assert!(store.active.is_empty());
        assert_eq!(next.active.len(), 1);
        let added = &next.active[0];
        assert_eq!(added.id, 100);
        assert_eq!(added.title, "Pay rent");
        assert_eq!(added.repeat_days, vec![Weekday::Monday, Weekday::Friday]);
        assert_eq!(added.completed_on, None);
    }

    #[test]
    fn add_ignores_blank_title() {
        let store = Store::new(vec![task(1, &[], None)], Vec::new());
        let next = add(
            &store,
            NewTask {
                title: "   ".to_string(),
                ..NewTask::default()
            },
            5,
        );
        assert_eq!(next, store);
    }

    #[test]
    fn ids_stay_monotonic_when_clock_lags() {
        let store = Store::new(vec![task(50, &[], None)], vec![task(90, &[], None)]);
        assert_eq!(next_id(&store, 10), 91);
        assert_eq!(next_id(&store, 200), 200);
        assert_eq!(next_id(&Store::default(), 7), 7);
    }

    #[test]
    fn toggle_done_twice_restores_original_value() {
        let open = Store::new(vec![task(1, &[Weekday::Monday], None)], Vec::new());
        let once = toggle_done(&open, 1, MONDAY);
        assert_eq!(once.active[0].completed_on, Some(MONDAY));
        assert_eq!(toggle_done(&once, 1, MONDAY), open);

        let done_today = Store::new(vec![task(1, &[], Some(MONDAY))], Vec::new());
        let twice = toggle_done(&toggle_done(&done_today, 1, MONDAY), 1, MONDAY);
        assert_eq!(twice, done_today);
    }

    #[test]
    fn toggle_done_overwrites_stale_completion() {
        let stale = Store::new(
            vec![task(1, &[Weekday::Monday], Some(date!(2024 - 04 - 08)))],
            Vec::new(),
        );
        let next = toggle_done(&stale, 1, MONDAY);
        assert_eq!(next.active[0].completed_on, Some(MONDAY));
    }

    #[test]
    fn toggle_done_unknown_id_is_noop() {
        let store = Store::new(vec![task(1, &[], None)], Vec::new());
        assert_eq!(toggle_done(&store, 2, MONDAY), store);
    }

    #[test]
    fn remove_then_restore_returns_task_to_active() {
        let store = Store::new(vec![task(1, &[], None), task(2, &[], None)], Vec::new());
        let removed = remove(&store, 1);
        assert_eq!(removed.active.len(), 1);
        assert_eq!(removed.removed[0].id, 1);

        let restored = restore(&removed, 1);
        assert!(restored.removed.is_empty());
        let mut ids: Vec<u64> = restored.active.iter().map(|task| task.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn remove_restore_and_delete_ignore_unknown_ids() {
        let store = Store::new(vec![task(1, &[], None)], vec![task(2, &[], None)]);
        assert_eq!(remove(&store, 2), store);
        assert_eq!(restore(&store, 1), store);
        assert_eq!(delete_forever(&store, 1), store);
    }

    #[test]
    fn delete_forever_erases_removed_task() {
        let store = Store::new(Vec::new(), vec![task(2, &[], None), task(3, &[], None)]);
        let next = delete_forever(&store, 2);
        assert_eq!(next.removed.len(), 1);
        assert_eq!(next.removed[0].id, 3);
    }

    #[test]
    fn clear_schedule_drops_date_and_repeats() {
        let mut dated = task(1, &[Weekday::Monday], None);
        dated.due_date = Some(MONDAY);
        let store = Store::new(vec![dated], Vec::new());

        let next = clear_schedule(&store, 1);
        assert_eq!(next.active[0].due_date, None);
        assert!(next.active[0].repeat_days.is_empty());
    }

    #[test]
    fn daily_reset_only_touches_matching_weekday() {
        let done = Some(date!(2024 - 04 - 14));
        let store = Store::new(
            vec![
                task(1, &[Weekday::Monday], done),
                task(2, &[Weekday::Tuesday], done),
                task(3, &[], done),
            ],
            Vec::new(),
        );

        let next = daily_reset(&store, MONDAY);
        assert_eq!(next.active[0].completed_on, None);
        assert_eq!(next.active[1].completed_on, done);
        assert_eq!(next.active[2].completed_on, done);
    }

    #[test]
    fn reconcile_without_history_only_records_today() {
        let store = Store::new(vec![task(1, &[Weekday::Monday], Some(MONDAY))], Vec::new());
        let (next, last) = reconcile_daily_reset(&store, None, MONDAY);
        assert_eq!(next, store);
        assert_eq!(last, MONDAY);
    }

    #[test]
    fn reconcile_same_day_is_noop() {
        let store = Store::new(vec![task(1, &[Weekday::Monday], Some(MONDAY))], Vec::new());
        let (next, last) = reconcile_daily_reset(&store, Some(MONDAY), MONDAY);
        assert_eq!(next, store);
        assert_eq!(last, MONDAY);
    }

    #[test]
    fn reconcile_future_last_reset_rebases_to_today() {
        let store = Store::new(vec![task(1, &[Weekday::Tuesday], Some(MONDAY))], Vec::new());
        let (next, last) = reconcile_daily_reset(&store, Some(date!(2030 - 01 - 01)), MONDAY);
        assert_eq!(next, store);
        assert_eq!(last, MONDAY);

        let tuesday = date!(2024 - 04 - 16);
        let (next, last) = reconcile_daily_reset(&next, Some(last), tuesday);
        assert_eq!(last, tuesday);
        assert_eq!(next.active[0].completed_on, None);
    }

    #[test]
    fn reconcile_applies_every_missed_day() {
        let done = Some(date!(2024 - 04 - 12));
        let store = Store::new(
            vec![
                task(1, &[Weekday::Saturday], done),
                task(2, &[Weekday::Monday], done),
                task(3, &[Weekday::Friday], done),
            ],
            Vec::new(),
        );

        // Last reset on Friday; Saturday, Sunday and Monday were missed.
        let (next, last) = reconcile_daily_reset(&store, Some(date!(2024 - 04 - 12)), MONDAY);
        assert_eq!(last, MONDAY);
        assert_eq!(next.active[0].completed_on, None);
        assert_eq!(next.active[1].completed_on, None);
        assert_eq!(next.active[2].completed_on, done);
    }

    #[test]
    fn reconcile_long_gap_covers_whole_week() {
        let done = Some(date!(2024 - 01 - 01));
        let store = Store::new(
            vec![task(1, &[Weekday::Tuesday], done), task(2, &[], done)],
            Vec::new(),
        );
        let (next, last) = reconcile_daily_reset(&store, Some(date!(2024 - 01 - 01)), MONDAY);
        assert_eq!(last, MONDAY);
        assert_eq!(next.active[0].completed_on, None);
        assert_eq!(next.active[1].completed_on, done);
    }
}
