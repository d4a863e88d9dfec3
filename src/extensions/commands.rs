use std::path::PathBuf;
use std::sync::Mutex;

use tauri::{AppHandle, State};
use tauri_plugin_dialog::DialogExt;

use super::model::{ExtensionDescriptor, ExtensionId, MoveDirection};
use super::storage::ExtensionStore;
use crate::common::error::{ImportError, ToTauriError};
use crate::config::commands::SettingsState;
use crate::i18n::{self, Notice};
use crate::logging;

pub struct ExtensionState {
    pub store: Mutex<ExtensionStore>,
}

impl ExtensionState {
    pub fn new(store: ExtensionStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    /// Enabled descriptors, copied so the lock is not held while scripts run
    pub fn enabled_snapshot(&self) -> Vec<ExtensionDescriptor> {
        match self.store.lock() {
            Ok(store) => store.enabled(),
            Err(e) => {
                log::error!("Extension store lock poisoned: {}", e);
                Vec::new()
            }
        }
    }
}

fn import_from(
    state: &ExtensionState,
    settings: &SettingsState,
    path: PathBuf,
) -> Result<ExtensionDescriptor, Notice> {
    let language = settings.language();
    let mut store = state
        .store
        .lock()
        .map_err(|e| i18n::import_error_notice(&ImportError::Io(poisoned(e)), language))?;

    match store.import_from_file(&path) {
        Ok(descriptor) => {
            let _ = logging::write_domain_log(
                "audit",
                &format!("Added extension '{}' ({})", descriptor.name, descriptor.id),
            );
            Ok(descriptor)
        }
        Err(e) => {
            log::warn!("Rejected extension file {:?}: {}", path, e);
            Err(i18n::import_error_notice(&e, language))
        }
    }
}

fn poisoned<T>(e: std::sync::PoisonError<T>) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

#[tauri::command]
pub fn list_extensions(
    state: State<'_, ExtensionState>,
) -> Result<Vec<ExtensionDescriptor>, String> {
    let store = state.store.lock().map_err(|e| e.to_string())?;
    Ok(store.extensions().to_vec())
}

/// Ask for a descriptor file and import it. `Ok(None)` when the picker was cancelled.
#[tauri::command]
pub async fn import_extension(
    app: AppHandle,
    state: State<'_, ExtensionState>,
    settings: State<'_, SettingsState>,
) -> Result<Option<ExtensionDescriptor>, Notice> {
    let language = settings.language();
    let picked = app
        .dialog()
        .file()
        .set_title(i18n::ui_string(language, "select_extension").unwrap_or("Select Extension"))
        .add_filter(
            i18n::ui_string(language, "json_files").unwrap_or("JSON Files"),
            &["json"],
        )
        .blocking_pick_file();

    let Some(file) = picked else {
        return Ok(None);
    };
    let path = file
        .into_path()
        .map_err(|e| i18n::import_error_notice(&ImportError::NotJson(e.to_string()), language))?;

    import_from(&state, &settings, path).map(Some)
}

#[tauri::command]
pub fn import_extension_from_path(
    path: String,
    state: State<'_, ExtensionState>,
    settings: State<'_, SettingsState>,
) -> Result<ExtensionDescriptor, Notice> {
    import_from(&state, &settings, PathBuf::from(path))
}

#[tauri::command]
pub fn remove_extension(id: String, state: State<'_, ExtensionState>) -> Result<(), String> {
    let mut store = state.store.lock().map_err(|e| e.to_string())?;
    let removed = store
        .remove(&ExtensionId::from(id))
        .map_err(|e| e.to_tauri_error())?;

    let _ = logging::write_domain_log(
        "audit",
        &format!("Removed extension '{}' ({})", removed.name, removed.id),
    );
    Ok(())
}

#[tauri::command]
pub fn toggle_extension(id: String, state: State<'_, ExtensionState>) -> Result<bool, String> {
    let mut store = state.store.lock().map_err(|e| e.to_string())?;
    let id = ExtensionId::from(id);
    let enabled = store.toggle(&id).map_err(|e| e.to_tauri_error())?;

    let _ = logging::write_domain_log(
        "audit",
        &format!("Set extension {} enabled: {}", id, enabled),
    );
    Ok(enabled)
}

#[tauri::command]
pub fn move_extension(
    id: String,
    direction: MoveDirection,
    state: State<'_, ExtensionState>,
) -> Result<Vec<ExtensionDescriptor>, String> {
    let mut store = state.store.lock().map_err(|e| e.to_string())?;
    store
        .move_extension(&ExtensionId::from(id), direction)
        .map_err(|e| e.to_tauri_error())?;
    Ok(store.extensions().to_vec())
}

#[tauri::command]
pub fn reload_extensions(
    state: State<'_, ExtensionState>,
) -> Result<Vec<ExtensionDescriptor>, String> {
    let mut store = state.store.lock().map_err(|e| e.to_string())?;
    store.reload().map_err(|e| e.to_tauri_error())?;
    Ok(store.extensions().to_vec())
}
