use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Difficulty, Task};

/// The three sidebar tabs. Which one is active decides what the task panel
/// shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Pending,
    Calendar,
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayClass {
    Past,
    Today,
    Future,
}

/// Day-resolution classification. Both sides are already calendar days; any
/// time-of-day component was discarded at the boundary, never in here.
pub fn classify_day(day: NaiveDate, today: NaiveDate) -> DayClass {
    match day.cmp(&today) {
        Ordering::Less => DayClass::Past,
        Ordering::Equal => DayClass::Today,
        Ordering::Greater => DayClass::Future,
    }
}

/// Incomplete tasks dated strictly before today, in collection order.
pub fn pending_tasks(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| !t.completed && classify_day(t.date, today) == DayClass::Past)
        .cloned()
        .collect()
}

/// Incomplete tasks dated strictly after today, in collection order.
/// Tasks due today land in neither this list nor the pending one.
pub fn upcoming_tasks(tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| !t.completed && classify_day(t.date, today) == DayClass::Future)
        .cloned()
        .collect()
}

/// Every task on the given day. Completed tasks stay visible here, unlike in
/// the pending/upcoming lists.
pub fn tasks_on(tasks: &[Task], day: NaiveDate) -> Vec<Task> {
    tasks.iter().filter(|t| t.date == day).cloned().collect()
}

/// What the side panel shows for the active tab. The calendar tab shows the
/// selected day's tasks, or nothing while no day is selected.
pub fn panel_tasks(
    tab: Tab,
    selected: Option<NaiveDate>,
    tasks: &[Task],
    today: NaiveDate,
) -> Vec<Task> {
    match tab {
        Tab::Pending => pending_tasks(tasks, today),
        Tab::Upcoming => upcoming_tasks(tasks, today),
        Tab::Calendar => selected.map(|day| tasks_on(tasks, day)).unwrap_or_default(),
    }
}

/// Badge summary rendered in a calendar cell's corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DayBadge {
    pub count: usize,
    pub color: Option<&'static str>,
}

/// Counts every task on the day (completed included) and picks the color of
/// the highest difficulty present.
pub fn day_badge(day: NaiveDate, tasks: &[Task]) -> DayBadge {
    let mut count = 0;
    let mut top: Option<Difficulty> = None;
    for task in tasks.iter().filter(|t| t.date == day) {
        count += 1;
        top = top.max(Some(task.difficulty));
    }
    DayBadge {
        count,
        color: top.map(Difficulty::color),
    }
}
