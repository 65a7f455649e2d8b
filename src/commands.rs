use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;

use crate::calendar;
use crate::events::StatePayload;
#[cfg(all(feature = "app", not(test)))]
use crate::events::EVENT_STATE_UPDATED;
use crate::models::{Settings, Task, TaskDraft};
use crate::persist::PersistRequest;
#[cfg(all(feature = "app", not(test)))]
use crate::persist::PersistHandle;
use crate::state::{AppState, Navigation};
use crate::views::{self, DayBadge, Tab};

#[cfg(all(feature = "app", not(test)))]
use tauri::{AppHandle, Emitter, Manager, Runtime, State};

#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// What a command needs from the surrounding application: a way to enqueue
/// durability requests and a way to notify windows of a state change. Tests
/// substitute a recording mock.
pub trait CommandCtx {
    fn dispatch_persist(&self, request: PersistRequest);
    fn emit_state_updated(&self, payload: StatePayload);
}

fn ok<T>(data: T) -> CommandResult<T> {
    CommandResult {
        ok: true,
        data: Some(data),
        error: None,
    }
}

fn err<T>(message: &str) -> CommandResult<T> {
    CommandResult {
        ok: false,
        data: None,
        error: Some(message.to_string()),
    }
}

/// The only place the wall clock enters the view engine: truncate to the
/// local calendar day before any comparison.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn state_payload(state: &AppState) -> StatePayload {
    StatePayload {
        tasks: state.tasks(),
        settings: state.settings(),
        navigation: state.navigation(),
    }
}

/// Time-derived id, bumped until unique within the collection so two rapid
/// creations in the same millisecond cannot collide.
fn allocate_task_id(state: &AppState, now_ms: i64) -> String {
    let mut candidate = now_ms;
    loop {
        let id = candidate.to_string();
        if !state.contains_id(&id) {
            return id;
        }
        candidate += 1;
    }
}

pub fn load_state_impl(state: &AppState) -> CommandResult<StatePayload> {
    ok(state_payload(state))
}

pub fn create_task_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    draft: TaskDraft,
) -> CommandResult<Task> {
    let nav = state.navigation();
    if nav.active_tab != Tab::Calendar {
        return err("task creation requires the calendar tab");
    }
    let Some(date) = nav.selected_date else {
        return err("no day selected");
    };

    let name = draft.name.trim();
    let subject = draft.subject.trim();
    if name.is_empty() || subject.is_empty() {
        return err("name and subject must not be empty");
    }

    let task = Task {
        id: allocate_task_id(state, Utc::now().timestamp_millis()),
        name: name.to_string(),
        subject: subject.to_string(),
        difficulty: draft
            .difficulty
            .unwrap_or(state.settings().default_difficulty),
        date,
        completed: false,
    };

    state.add_task(task.clone());
    ctx.dispatch_persist(PersistRequest::SaveTask(task.clone()));
    ctx.emit_state_updated(state_payload(state));
    ok(task)
}

pub fn toggle_task_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    task_id: String,
) -> CommandResult<bool> {
    // Unknown ids are a silent no-op, not an error.
    let Some(task) = state.toggle_task(&task_id) else {
        return ok(false);
    };
    ctx.dispatch_persist(PersistRequest::SaveTask(task));
    ctx.emit_state_updated(state_payload(state));
    ok(true)
}

pub fn delete_task_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    task_id: String,
) -> CommandResult<bool> {
    if !state.remove_task(&task_id) {
        return ok(false);
    }
    ctx.dispatch_persist(PersistRequest::DeleteTask(task_id));
    ctx.emit_state_updated(state_payload(state));
    ok(true)
}

pub fn update_settings_impl(
    ctx: &impl CommandCtx,
    state: &AppState,
    mut settings: Settings,
) -> CommandResult<Settings> {
    // Normalize user input so the persisted config is stable.
    let next_theme = settings.theme.trim().to_lowercase();
    settings.theme = match next_theme.as_str() {
        "light" | "dark" => next_theme,
        _ => Settings::default().theme,
    };

    state.update_settings(settings.clone());
    ctx.dispatch_persist(PersistRequest::SaveSettings(state.settings_file()));
    ctx.emit_state_updated(state_payload(state));
    ok(settings)
}

pub fn set_active_tab_impl(state: &AppState, tab: Tab) -> CommandResult<Navigation> {
    ok(state.set_active_tab(tab))
}

pub fn select_day_impl(state: &AppState, day: NaiveDate) -> CommandResult<Navigation> {
    ok(state.select_day(day))
}

pub fn shift_month_impl(state: &AppState, delta: i32) -> CommandResult<Navigation> {
    let nav = state.navigation();
    let (year, month) = calendar::shift_month(nav.visible_year, nav.visible_month, delta);
    ok(state.set_visible_month(year, month))
}

pub fn jump_to_today_impl(state: &AppState) -> CommandResult<Navigation> {
    ok(state.jump_to_today(today()))
}

pub fn panel_tasks_impl(state: &AppState) -> CommandResult<Vec<Task>> {
    let nav = state.navigation();
    let tasks = state.tasks();
    ok(views::panel_tasks(
        nav.active_tab,
        nav.selected_date,
        &tasks,
        today(),
    ))
}

/// One render-ready cell of the visible month.
#[derive(Debug, Serialize)]
pub struct MonthCell {
    pub day: u32,
    pub is_current_month: bool,
    pub date: NaiveDate,
    pub is_today: bool,
    pub is_selected: bool,
    pub badge: DayBadge,
}

#[derive(Debug, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<MonthCell>,
}

pub fn month_view_impl(state: &AppState) -> CommandResult<MonthView> {
    let nav = state.navigation();
    let tasks = state.tasks();
    let now = today();

    let cells = calendar::month_grid(nav.visible_year, nav.visible_month)
        .into_iter()
        .map(|cell| MonthCell {
            day: cell.day,
            is_current_month: cell.is_current_month,
            date: cell.date,
            is_today: cell.date == now,
            is_selected: nav.selected_date == Some(cell.date),
            badge: views::day_badge(cell.date, &tasks),
        })
        .collect();

    ok(MonthView {
        year: nav.visible_year,
        month: nav.visible_month,
        cells,
    })
}

#[cfg(all(feature = "app", not(test)))]
struct TauriCommandCtx<'a, R: Runtime> {
    app: &'a AppHandle<R>,
}

#[cfg(all(feature = "app", not(test)))]
impl<R: Runtime> CommandCtx for TauriCommandCtx<'_, R> {
    fn dispatch_persist(&self, request: PersistRequest) {
        self.app.state::<PersistHandle>().dispatch(request);
    }

    fn emit_state_updated(&self, payload: StatePayload) {
        let _ = self.app.emit(EVENT_STATE_UPDATED, payload);
    }
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn load_state(state: State<AppState>) -> CommandResult<StatePayload> {
    load_state_impl(state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn create_task(
    app: AppHandle,
    state: State<AppState>,
    draft: TaskDraft,
) -> CommandResult<Task> {
    let ctx = TauriCommandCtx { app: &app };
    create_task_impl(&ctx, state.inner(), draft)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn toggle_task(app: AppHandle, state: State<AppState>, task_id: String) -> CommandResult<bool> {
    let ctx = TauriCommandCtx { app: &app };
    toggle_task_impl(&ctx, state.inner(), task_id)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn delete_task(app: AppHandle, state: State<AppState>, task_id: String) -> CommandResult<bool> {
    let ctx = TauriCommandCtx { app: &app };
    delete_task_impl(&ctx, state.inner(), task_id)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn update_settings(
    app: AppHandle,
    state: State<AppState>,
    settings: Settings,
) -> CommandResult<Settings> {
    let ctx = TauriCommandCtx { app: &app };
    update_settings_impl(&ctx, state.inner(), settings)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn set_active_tab(state: State<AppState>, tab: Tab) -> CommandResult<Navigation> {
    set_active_tab_impl(state.inner(), tab)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn select_day(state: State<AppState>, day: NaiveDate) -> CommandResult<Navigation> {
    select_day_impl(state.inner(), day)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn shift_month(state: State<AppState>, delta: i32) -> CommandResult<Navigation> {
    shift_month_impl(state.inner(), delta)
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn jump_to_today(state: State<AppState>) -> CommandResult<Navigation> {
    jump_to_today_impl(state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn panel_tasks(state: State<AppState>) -> CommandResult<Vec<Task>> {
    panel_tasks_impl(state.inner())
}

#[cfg(all(feature = "app", not(test)))]
#[tauri::command]
pub fn month_view(state: State<AppState>) -> CommandResult<MonthView> {
    month_view_impl(state.inner())
}
