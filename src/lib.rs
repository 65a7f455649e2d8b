// Learn more about Tauri commands at https://tauri.app/develop/calling-rust/
pub mod calendar;
pub mod commands;
pub mod events;
pub mod logging;
pub mod models;
pub mod persist;
pub mod state;
pub mod storage;
pub mod views;

#[cfg(all(feature = "app", not(test)))]
use tauri::Manager;

#[cfg(all(feature = "app", not(test)))]
use crate::commands::*;
#[cfg(all(feature = "app", not(test)))]
use crate::persist::{run_persister, PersistHandle};
#[cfg(all(feature = "app", not(test)))]
use crate::state::AppState;
#[cfg(all(feature = "app", not(test)))]
use crate::storage::Storage;

#[cfg_attr(mobile, tauri::mobile_entry_point)]
#[cfg(all(feature = "app", not(test)))]
pub fn run() {
    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .setup(|app| {
            let data_dir = app.path().app_data_dir()?;
            if let Err(error) = crate::logging::init_logging(&data_dir) {
                eprintln!("failed to initialize logging: {error}");
            }

            let storage = Storage::new(data_dir.clone());
            storage.ensure_dirs()?;

            // A failed load must not block startup; it only means an empty planner.
            let tasks = match storage.load_tasks() {
                Ok(tasks) => tasks,
                Err(error) => {
                    log::error!("failed to load tasks, starting empty: {error}");
                    Vec::new()
                }
            };
            let settings = storage
                .load_settings()
                .map(|file| file.settings)
                .unwrap_or_default();

            let today = chrono::Local::now().date_naive();
            let state = AppState::new(tasks, settings, today);
            app.manage(state);

            // Durability requests drain on their own task; commands never wait on disk.
            let (persist_handle, persist_rx) = PersistHandle::channel();
            app.manage(persist_handle);
            tauri::async_runtime::spawn(run_persister(Storage::new(data_dir), persist_rx));

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            load_state,
            create_task,
            toggle_task,
            delete_task,
            update_settings,
            set_active_tab,
            select_day,
            shift_month,
            jump_to_today,
            panel_tasks,
            month_view,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
