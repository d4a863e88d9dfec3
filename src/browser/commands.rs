use std::sync::Mutex;

use tauri::webview::PageLoadEvent;
use tauri::{AppHandle, Emitter, Manager, Runtime, State, Webview, WebviewBuilder, WebviewUrl};
use url::Url;

use super::downloads;
use super::navigation::{display_title, normalize_url};
use super::page;
use super::tabs::{TabInfo, TabRegistry};
use crate::common::error::TabError;
use crate::common::window::desktop::window_layout;
use crate::common::window::MAIN_WINDOW;
use crate::config::commands::SettingsState;
use crate::i18n::{self, Notice};

#[derive(Default)]
pub struct BrowserState {
    pub tabs: Mutex<TabRegistry>,
}

fn lock_error<T>(e: std::sync::PoisonError<T>) -> TabError {
    TabError::Webview(e.to_string())
}

/// Webview of the active tab.
pub fn active_webview<R: Runtime>(
    app: &AppHandle<R>,
    browser: &BrowserState,
) -> Result<Webview<R>, TabError> {
    let label = browser
        .tabs
        .lock()
        .map_err(lock_error)?
        .active_label()
        .map(str::to_string)
        .ok_or_else(|| TabError::NotFound("active tab".to_string()))?;
    app.get_webview(&label).ok_or(TabError::NotFound(label))
}

/// Create a tab webview below the toolbar, make it active and hide the
/// previously active one.
pub fn open_tab<R: Runtime>(app: &AppHandle<R>, url: Url) -> Result<TabInfo, TabError> {
    let browser = app.state::<BrowserState>();
    let window = app
        .get_window(MAIN_WINDOW)
        .ok_or_else(|| TabError::NotFound(MAIN_WINDOW.to_string()))?;
    let layout = window_layout(&window).map_err(|e| TabError::Webview(e.to_string()))?;
    let label = browser.tabs.lock().map_err(lock_error)?.allocate_label();

    let builder = WebviewBuilder::new(&label, WebviewUrl::External(url.clone()))
        .on_page_load(|webview, payload| {
            if matches!(payload.event(), PageLoadEvent::Finished) {
                page::on_page_finished(&webview, payload.url());
            }
        })
        .on_download(|webview, event| downloads::desktop::handle_download(&webview, event));

    let webview = window
        .add_child(builder, layout.position(), layout.size())
        .map_err(|e| TabError::Webview(e.to_string()))?;

    let tab = TabInfo {
        label: label.clone(),
        url: url.to_string(),
        title: display_title(&url),
    };
    let previous = browser.tabs.lock().map_err(lock_error)?.insert(tab.clone());
    if let Some(previous) = previous.and_then(|l| app.get_webview(&l)) {
        let _ = previous.hide();
    }
    let _ = webview.show();
    let _ = webview.set_focus();

    log::info!("Opened {} at {}", label, url);
    let _ = app.emit("tab-created", &tab);
    Ok(tab)
}

fn homepage(settings: &SettingsState) -> String {
    settings
        .config
        .lock()
        .map(|c| c.homepage.clone())
        .unwrap_or_else(|_| crate::config::DEFAULT_HOMEPAGE.to_string())
}

/// Open the homepage in the first tab.
pub fn open_initial_tab<R: Runtime>(app: &AppHandle<R>) -> Result<TabInfo, TabError> {
    let settings = app.state::<SettingsState>();
    let url = normalize_url(&homepage(&settings))?;
    open_tab(app, url)
}

#[tauri::command]
pub async fn create_tab(
    url: Option<String>,
    app: AppHandle,
    settings: State<'_, SettingsState>,
) -> Result<TabInfo, Notice> {
    let language = settings.language();
    let target = url.unwrap_or_else(|| homepage(&settings));
    normalize_url(&target)
        .and_then(|url| open_tab(&app, url))
        .map_err(|e| i18n::tab_error_notice(&e, language))
}

#[tauri::command]
pub fn close_tab(
    label: String,
    app: AppHandle,
    browser: State<'_, BrowserState>,
    settings: State<'_, SettingsState>,
) -> Result<Option<String>, Notice> {
    let language = settings.language();
    let next = browser
        .tabs
        .lock()
        .map_err(lock_error)
        .and_then(|mut tabs| tabs.close(&label))
        .map_err(|e| i18n::tab_error_notice(&e, language))?;

    if let Some(webview) = app.get_webview(&label) {
        if let Err(e) = webview.close() {
            log::warn!("Failed to close webview {}: {}", label, e);
        }
    }
    if let Some(next_webview) = next.as_deref().and_then(|l| app.get_webview(l)) {
        let _ = next_webview.show();
        let _ = next_webview.set_focus();
    }

    let _ = app.emit("tab-closed", &label);
    if let Some(next) = &next {
        let _ = app.emit("tab-activated", next);
    }
    Ok(next)
}

#[tauri::command]
pub fn switch_tab(
    label: String,
    app: AppHandle,
    browser: State<'_, BrowserState>,
) -> Result<(), String> {
    let previous = browser
        .tabs
        .lock()
        .map_err(|e| e.to_string())?
        .activate(&label)
        .map_err(|e| e.to_string())?;

    let Some(previous) = previous else {
        return Ok(());
    };
    if let Some(old) = app.get_webview(&previous) {
        let _ = old.hide();
    }
    if let Some(webview) = app.get_webview(&label) {
        let _ = webview.show();
        let _ = webview.set_focus();
    }
    let _ = app.emit("tab-activated", &label);
    Ok(())
}

#[tauri::command]
pub fn list_tabs(browser: State<'_, BrowserState>) -> Result<Vec<TabInfo>, String> {
    let tabs = browser.tabs.lock().map_err(|e| e.to_string())?;
    Ok(tabs.tabs().to_vec())
}

#[tauri::command]
pub fn get_active_tab(browser: State<'_, BrowserState>) -> Result<Option<TabInfo>, String> {
    let tabs = browser.tabs.lock().map_err(|e| e.to_string())?;
    Ok(tabs.active().cloned())
}
