pub mod browser;
pub mod common;
pub mod config;
pub mod extensions;
pub mod i18n;
pub mod logging;

#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use browser::commands::BrowserState;
    use common::window::desktop::{build_main_window, relayout_tabs};
    use common::window::MAIN_WINDOW;
    use config::commands::SettingsState;
    use extensions::commands::ExtensionState;
    use extensions::ExtensionStore;
    use std::sync::Mutex;
    use tauri::Manager;

    // Load existing config or use default
    let app_config = config::load_config().unwrap_or_default();
    let language = app_config.language;

    // Initialize domain logs (audit, extension, download, crash)
    if let Ok(root_dir) = config::get_app_root_dir() {
        logging::init_log_dir(root_dir);
        logging::setup_panic_hook();
    }

    let settings_path = config::get_config_path().unwrap_or_else(|_| "config.json".into());
    let store_path = ExtensionStore::default_path().unwrap_or_else(|e| {
        log::error!("No data directory for extensions: {}", e);
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(config::APP_DIR_NAME)
            .join(extensions::storage::STORE_FILE_NAME)
    });
    let store = match ExtensionStore::open_or_recover(store_path.clone()) {
        Ok((store, backup)) => {
            if let Some(backup) = backup {
                log::warn!("Extension list was unreadable, saved a copy at {:?}", backup);
            }
            store
        }
        Err(e) => {
            log::error!("Failed to load extensions from {:?}: {}", store_path, e);
            ExtensionStore::unloaded(store_path)
        }
    };

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _args, _cwd| {
            // When a second instance is launched, focus the existing window
            if let Some(window) = app.get_window(MAIN_WINDOW) {
                let _ = window.unminimize();
                let _ = window.set_focus();
            }
        }))
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(
            tauri_plugin_log::Builder::default()
                .level(if app_config.verbose_logging {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                })
                .level_for(
                    "freenetix_lib",
                    if app_config.verbose_logging {
                        log::LevelFilter::Trace
                    } else {
                        log::LevelFilter::Debug
                    },
                )
                .targets([
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::Stdout),
                    tauri_plugin_log::Target::new(tauri_plugin_log::TargetKind::Folder {
                        path: config::get_app_root_dir().unwrap_or_default().join("logs"),
                        file_name: Some("app".to_string()),
                    }),
                ])
                .rotation_strategy(tauri_plugin_log::RotationStrategy::KeepOne)
                .timezone_strategy(tauri_plugin_log::TimezoneStrategy::UseLocal)
                .build(),
        )
        .manage(SettingsState {
            path: settings_path,
            config: Mutex::new(app_config),
            active_language: language,
        })
        .manage(ExtensionState::new(store))
        .manage(BrowserState::default())
        .setup(|app| {
            build_main_window(app.handle(), "Freenetix")?;
            if let Err(e) = browser::commands::open_initial_tab(app.handle()) {
                log::error!("Failed to open the first tab: {}", e);
            }
            Ok(())
        })
        .on_window_event(|window, event| {
            if let tauri::WindowEvent::Resized(_) = event {
                if window.label() == MAIN_WINDOW {
                    relayout_tabs(window);
                }
            }
        })
        .invoke_handler(tauri::generate_handler![
            browser::commands::create_tab,
            browser::commands::close_tab,
            browser::commands::switch_tab,
            browser::commands::list_tabs,
            browser::commands::get_active_tab,
            browser::navigation::commands::navigate,
            browser::navigation::commands::go_back,
            browser::navigation::commands::go_forward,
            browser::navigation::commands::reload,
            browser::downloads::desktop::reveal_download,
            extensions::commands::list_extensions,
            extensions::commands::import_extension,
            extensions::commands::import_extension_from_path,
            extensions::commands::remove_extension,
            extensions::commands::toggle_extension,
            extensions::commands::move_extension,
            extensions::commands::reload_extensions,
            config::commands::load_settings,
            config::commands::save_settings,
            config::commands::list_languages,
            config::commands::get_ui_strings,
            common::window::desktop::open_extension_manager,
            common::window::desktop::open_settings,
            common::utils::get_system_info,
            logging::get_logs,
        ])
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|_app_handle, event| {
            if let tauri::RunEvent::Exit = event {
                log::info!("Application exiting");
            }
        });
}
