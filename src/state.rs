use std::sync::{Arc, Mutex};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Settings, SettingsFile, Task};
use crate::views::Tab;

const SCHEMA_VERSION: u32 = 1;

/// Ephemeral per-session navigation: active tab, selected day, visible month.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Navigation {
    pub active_tab: Tab,
    pub selected_date: Option<NaiveDate>,
    pub visible_year: i32,
    pub visible_month: u32,
}

impl Navigation {
    /// The app opens on the calendar tab with today selected and visible.
    pub fn starting_at(today: NaiveDate) -> Self {
        Self {
            active_tab: Tab::Calendar,
            selected_date: Some(today),
            visible_year: today.year(),
            visible_month: today.month(),
        }
    }
}

/// Canonical in-memory state for the process lifetime. Loaded once at startup;
/// afterwards the collection is the source of truth regardless of what the
/// durability worker manages to write.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(tasks: Vec<Task>, settings: Settings, today: NaiveDate) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AppData {
                tasks,
                settings,
                navigation: Navigation::starting_at(today),
            })),
        }
    }

    pub fn tasks(&self) -> Vec<Task> {
        let guard = self.inner.lock().expect("state poisoned");
        guard.tasks.clone()
    }

    pub fn contains_id(&self, task_id: &str) -> bool {
        let guard = self.inner.lock().expect("state poisoned");
        guard.tasks.iter().any(|task| task.id == task_id)
    }

    pub fn add_task(&self, task: Task) {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.tasks.push(task);
    }

    /// Flips completion in place and returns the updated task, or `None` when
    /// the id is unknown.
    pub fn toggle_task(&self, task_id: &str) -> Option<Task> {
        let mut guard = self.inner.lock().expect("state poisoned");
        let task = guard.tasks.iter_mut().find(|t| t.id == task_id)?;
        task.completed = !task.completed;
        Some(task.clone())
    }

    /// Removes the task; `false` when the id is unknown.
    pub fn remove_task(&self, task_id: &str) -> bool {
        let mut guard = self.inner.lock().expect("state poisoned");
        let before = guard.tasks.len();
        guard.tasks.retain(|task| task.id != task_id);
        guard.tasks.len() != before
    }

    pub fn settings(&self) -> Settings {
        let guard = self.inner.lock().expect("state poisoned");
        guard.settings.clone()
    }

    pub fn settings_file(&self) -> SettingsFile {
        let guard = self.inner.lock().expect("state poisoned");
        SettingsFile {
            schema_version: SCHEMA_VERSION,
            settings: guard.settings.clone(),
        }
    }

    pub fn update_settings(&self, settings: Settings) {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.settings = settings;
    }

    pub fn navigation(&self) -> Navigation {
        let guard = self.inner.lock().expect("state poisoned");
        guard.navigation.clone()
    }

    pub fn set_active_tab(&self, tab: Tab) -> Navigation {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.navigation.active_tab = tab;
        guard.navigation.clone()
    }

    pub fn select_day(&self, day: NaiveDate) -> Navigation {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.navigation.selected_date = Some(day);
        guard.navigation.clone()
    }

    pub fn set_visible_month(&self, year: i32, month: u32) -> Navigation {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.navigation.visible_year = year;
        guard.navigation.visible_month = month;
        guard.navigation.clone()
    }

    /// The "Today" button: re-center the calendar on the current month and
    /// select today.
    pub fn jump_to_today(&self, today: NaiveDate) -> Navigation {
        let mut guard = self.inner.lock().expect("state poisoned");
        guard.navigation.selected_date = Some(today);
        guard.navigation.visible_year = today.year();
        guard.navigation.visible_month = today.month();
        guard.navigation.clone()
    }
}

#[derive(Debug)]
struct AppData {
    tasks: Vec<Task>,
    settings: Settings,
    navigation: Navigation,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Difficulty;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn make_task(id: &str, date: NaiveDate) -> Task {
        Task {
            id: id.to_string(),
            name: format!("task-{id}"),
            subject: "Physics".to_string(),
            difficulty: Difficulty::Moderate,
            date,
            completed: false,
        }
    }

    fn make_state(tasks: Vec<Task>) -> AppState {
        AppState::new(tasks, Settings::default(), day(2024, 6, 15))
    }

    #[test]
    fn navigation_starts_on_calendar_with_today_selected() {
        let state = make_state(Vec::new());
        let nav = state.navigation();
        assert_eq!(nav.active_tab, Tab::Calendar);
        assert_eq!(nav.selected_date, Some(day(2024, 6, 15)));
        assert_eq!(nav.visible_year, 2024);
        assert_eq!(nav.visible_month, 6);
    }

    #[test]
    fn add_and_contains_id() {
        let state = make_state(Vec::new());
        assert!(!state.contains_id("a"));
        state.add_task(make_task("a", day(2024, 6, 15)));
        assert!(state.contains_id("a"));
        assert_eq!(state.tasks().len(), 1);
    }

    #[test]
    fn toggle_task_flips_in_place_and_reports_missing_ids() {
        let state = make_state(vec![make_task("a", day(2024, 6, 15))]);

        let toggled = state.toggle_task("a").expect("task exists");
        assert!(toggled.completed);
        assert!(state.tasks()[0].completed);

        let toggled_back = state.toggle_task("a").expect("task exists");
        assert!(!toggled_back.completed);

        assert!(state.toggle_task("missing").is_none());
        assert_eq!(state.tasks().len(), 1);
    }

    #[test]
    fn remove_task_reports_whether_anything_was_removed() {
        let state = make_state(vec![make_task("a", day(2024, 6, 15))]);
        assert!(!state.remove_task("missing"));
        assert_eq!(state.tasks().len(), 1);
        assert!(state.remove_task("a"));
        assert!(state.tasks().is_empty());
    }

    #[test]
    fn navigation_mutators_return_the_updated_snapshot() {
        let state = make_state(Vec::new());

        let nav = state.set_active_tab(Tab::Upcoming);
        assert_eq!(nav.active_tab, Tab::Upcoming);

        let nav = state.select_day(day(2024, 7, 1));
        assert_eq!(nav.selected_date, Some(day(2024, 7, 1)));
        // Selecting a day does not switch the visible month by itself.
        assert_eq!(nav.visible_month, 6);

        let nav = state.set_visible_month(2025, 1);
        assert_eq!((nav.visible_year, nav.visible_month), (2025, 1));

        let nav = state.jump_to_today(day(2024, 6, 15));
        assert_eq!(nav.selected_date, Some(day(2024, 6, 15)));
        assert_eq!((nav.visible_year, nav.visible_month), (2024, 6));
    }

    #[test]
    fn settings_file_includes_schema_version() {
        let state = make_state(Vec::new());
        let file = state.settings_file();
        assert_eq!(file.schema_version, SCHEMA_VERSION);
        assert_eq!(file.settings.theme, Settings::default().theme);

        let mut next = Settings::default();
        next.theme = "light".to_string();
        state.update_settings(next);
        assert_eq!(state.settings().theme, "light");
    }
}
