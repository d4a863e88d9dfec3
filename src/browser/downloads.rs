use serde::Serialize;
use std::path::{Path, PathBuf};
use url::Url;

use crate::config::AppConfig;

const FALLBACK_FILE_NAME: &str = "download";

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DownloadRecord {
    pub tab: String,
    pub url: String,
    pub path: Option<PathBuf>,
    pub success: Option<bool>,
}

/// File name for a download: the last non-empty path segment, stripped of
/// characters no filesystem accepts.
pub fn suggested_file_name(url: &Url) -> String {
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(|s| {
            percent_decode(s)
                .chars()
                .map(|c| match c {
                    '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                    c if c.is_control() => '_',
                    c => c,
                })
                .collect::<String>()
        })
        .unwrap_or_default();

    let trimmed = segment.trim().trim_matches('.');
    if trimmed.is_empty() {
        FALLBACK_FILE_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

fn percent_decode(segment: &str) -> String {
    let escaped = segment.replace('+', "%2B").replace('&', "%26");
    url::form_urlencoded::parse(format!("x={}", escaped).as_bytes())
        .next()
        .map(|(_, value)| value.into_owned())
        .unwrap_or_else(|| segment.to_string())
}

/// First path under `dir` named `name` that does not exist yet; clashes get
/// " (1)", " (2)", ... inserted before the extension.
pub fn unique_destination(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let as_path = Path::new(name);
    let stem = as_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| name.to_string());
    let extension = as_path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter = 1u32;
    loop {
        let candidate = dir.join(format!("{} ({}){}", stem, counter, extension));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Configured download folder, else the platform one.
pub fn resolve_download_dir(config: &AppConfig) -> Option<PathBuf> {
    config.download_dir.clone().or_else(dirs::download_dir)
}

#[cfg(feature = "desktop")]
pub mod desktop {
    use super::{resolve_download_dir, suggested_file_name, unique_destination, DownloadRecord};
    use crate::config::commands::SettingsState;
    use crate::logging;
    use std::fs;
    use tauri::webview::DownloadEvent;
    use tauri::{Emitter, Manager, Runtime, Webview};

    /// Route a tab's download into the download folder and report progress to
    /// the toolbar. Returns whether the download may proceed.
    pub fn handle_download<R: Runtime>(webview: &Webview<R>, event: DownloadEvent<'_>) -> bool {
        match event {
            DownloadEvent::Requested { url, destination } => {
                let config = webview
                    .state::<SettingsState>()
                    .config
                    .lock()
                    .map(|c| c.clone())
                    .unwrap_or_default();

                if let Some(dir) = resolve_download_dir(&config) {
                    if let Err(e) = fs::create_dir_all(&dir) {
                        log::warn!("Failed to create download dir {:?}: {}", dir, e);
                    } else {
                        *destination = unique_destination(&dir, &suggested_file_name(&url));
                    }
                }

                log::info!("Download requested: {} -> {:?}", url, destination);
                let _ = logging::write_domain_log(
                    "download",
                    &format!("Started {} -> {}", url, destination.display()),
                );
                let _ = webview.emit(
                    "download-started",
                    DownloadRecord {
                        tab: webview.label().to_string(),
                        url: url.to_string(),
                        path: Some(destination.clone()),
                        success: None,
                    },
                );
                true
            }
            DownloadEvent::Finished { url, path, success } => {
                let outcome = if success { "Finished" } else { "Failed" };
                log::info!("Download {}: {} ({:?})", outcome.to_lowercase(), url, path);
                let _ = logging::write_domain_log(
                    "download",
                    &format!("{} {} ({:?})", outcome, url, path),
                );
                let _ = webview.emit(
                    "download-finished",
                    DownloadRecord {
                        tab: webview.label().to_string(),
                        url: url.to_string(),
                        path,
                        success: Some(success),
                    },
                );
                true
            }
            _ => true,
        }
    }

    #[tauri::command]
    pub fn reveal_download(path: String) -> Result<(), String> {
        tauri_plugin_opener::reveal_item_in_dir(&path).map_err(|e| e.to_string())
    }
}
