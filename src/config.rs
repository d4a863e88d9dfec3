use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::error::AppError;
use crate::i18n::Language;

pub const APP_DIR_NAME: &str = "freenetix";
pub const DEFAULT_HOMEPAGE: &str = "https://duckduckgo.com";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_homepage")]
    pub homepage: String,
    #[serde(default)]
    pub verbose_logging: bool,
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

fn default_homepage() -> String {
    DEFAULT_HOMEPAGE.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            homepage: default_homepage(),
            verbose_logging: false,
            download_dir: None,
        }
    }
}

/// Get the application root directory
pub fn get_app_root_dir() -> Result<PathBuf, AppError> {
    // A file named "portable" next to the executable keeps everything beside it.
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            if exe_dir.join("portable").exists() {
                return Ok(exe_dir.to_path_buf());
            }
        }
    }

    let base = dirs::config_dir()
        .ok_or_else(|| AppError::NotFound("platform config directory".to_string()))?;
    let path = base.join(APP_DIR_NAME);
    ensure_dir(&path)?;
    Ok(path)
}

fn ensure_dir(path: &Path) -> Result<(), AppError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Get the configuration directory: config/
pub fn get_config_dir() -> Result<PathBuf, AppError> {
    let config_dir = get_app_root_dir()?.join("config");
    ensure_dir(&config_dir)?;
    Ok(config_dir)
}

/// Get data directory: data/
pub fn get_data_dir() -> Result<PathBuf, AppError> {
    let data_dir = get_app_root_dir()?.join("data");
    ensure_dir(&data_dir)?;
    Ok(data_dir)
}

pub fn get_config_path() -> Result<PathBuf, AppError> {
    Ok(get_config_dir()?.join("config.json"))
}

/// Read settings from `path`. A missing file yields the defaults, and so does a
/// malformed one (with a warning).
pub fn load_config_from(path: &Path) -> Result<AppConfig, AppError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path)?;

    match serde_json::from_str::<AppConfig>(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            log::warn!("Failed to parse {:?}, using defaults: {}", path, e);
            Ok(AppConfig::default())
        }
    }
}

/// Overwrite the settings file at `path`.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Serialization(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

pub fn load_config() -> Result<AppConfig, AppError> {
    load_config_from(&get_config_path()?)
}

#[cfg(feature = "desktop")]
pub mod commands {
    use super::{save_config_to, AppConfig};
    use crate::common::error::ToTauriError;
    use crate::i18n::{self, Language, Notice};
    use crate::logging;
    use serde::Serialize;
    use std::collections::BTreeMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Settings as persisted on disk. The running shell keeps using the
    /// language it started with; saved changes apply on restart.
    pub struct SettingsState {
        pub path: PathBuf,
        pub config: Mutex<AppConfig>,
        pub active_language: Language,
    }

    impl SettingsState {
        pub fn language(&self) -> Language {
            self.active_language
        }
    }

    #[derive(Serialize)]
    pub struct LanguageOption {
        pub code: &'static str,
        pub name: &'static str,
    }

    #[tauri::command]
    pub fn load_settings(state: tauri::State<'_, SettingsState>) -> Result<AppConfig, String> {
        let config = state.config.lock().map_err(|e| e.to_string())?;
        Ok(config.clone())
    }

    #[tauri::command]
    pub fn save_settings(
        state: tauri::State<'_, SettingsState>,
        config: AppConfig,
    ) -> Result<Notice, String> {
        save_config_to(&state.path, &config).map_err(|e| e.to_tauri_error())?;

        let language = config.language;
        *state.config.lock().map_err(|e| e.to_string())? = config;

        let _ = logging::write_domain_log(
            "audit",
            &format!("Updated settings (language: {})", language.code()),
        );
        Ok(i18n::settings_saved_notice(state.language()))
    }

    #[tauri::command]
    pub fn list_languages() -> Vec<LanguageOption> {
        Language::all()
            .into_iter()
            .map(|l| LanguageOption {
                code: l.code(),
                name: l.display_name(),
            })
            .collect()
    }

    #[tauri::command]
    pub fn get_ui_strings(
        state: tauri::State<'_, SettingsState>,
    ) -> BTreeMap<&'static str, &'static str> {
        i18n::ui_strings(state.language())
    }
}
