use serde::Serialize;
use std::sync::Mutex;
use tauri::{Emitter, Manager, Runtime, Webview};
use url::Url;

use super::commands::BrowserState;
use super::navigation::{display_title, page_title_from_eval};
use crate::common::error::InjectionError;
use crate::config::commands::SettingsState;
use crate::extensions::commands::ExtensionState;
use crate::extensions::injector::{
    parse_completion, wrap_for_completion, CompletionCallback, PageContext, ScriptInjector,
};
use crate::extensions::model::ExtensionId;
use crate::i18n::{self, Notice};

impl<R: Runtime> PageContext for Webview<R> {
    fn describe(&self) -> String {
        match self.url() {
            Ok(url) => format!("{} ({})", self.label(), url),
            Err(_) => self.label().to_string(),
        }
    }

    fn execute(&self, script: String, on_complete: CompletionCallback) -> Result<(), String> {
        // The webview may call back more than once; only the first answer counts.
        let pending = Mutex::new(Some(on_complete));
        self.eval_with_callback(wrap_for_completion(&script), move |raw: String| {
            let callback = pending.lock().ok().and_then(|mut slot| slot.take());
            if let Some(callback) = callback {
                callback(parse_completion(&raw));
            }
        })
        .map_err(|e| e.to_string())
    }
}

/// Ask the page for `document.title` and put it on the tab once it answers.
fn refresh_title<R: Runtime>(webview: &Webview<R>) {
    let target = webview.clone();
    let result = webview.eval_with_callback("document.title", move |raw: String| {
        let Some(title) = page_title_from_eval(&raw) else {
            return;
        };
        let updated = target
            .state::<BrowserState>()
            .tabs
            .lock()
            .ok()
            .and_then(|mut tabs| tabs.update(target.label(), None, Some(&title)).ok().cloned());
        if let Some(tab) = updated {
            let _ = target.emit("tab-updated", &tab);
        }
    });
    if let Err(e) = result {
        log::debug!("Failed to read title of {}: {}", webview.label(), e);
    }
}

#[derive(Serialize, Clone, Debug)]
struct ExtensionErrorPayload {
    tab: String,
    id: ExtensionId,
    name: String,
    error: InjectionError,
    notice: Notice,
}

/// Runs when a tab finishes loading: refresh its strip entry and inject the
/// enabled extensions.
pub fn on_page_finished<R: Runtime>(webview: &Webview<R>, url: &Url) {
    let label = webview.label().to_string();

    let updated = webview
        .state::<BrowserState>()
        .tabs
        .lock()
        .ok()
        .and_then(|mut tabs| {
            tabs.update(&label, Some(url.as_str()), Some(&display_title(url)))
                .ok()
                .cloned()
        });
    if let Some(tab) = updated {
        let _ = webview.emit("tab-updated", &tab);
    }
    refresh_title(webview);

    let extensions = webview.state::<ExtensionState>().enabled_snapshot();
    if extensions.is_empty() {
        return;
    }

    let app = webview.app_handle().clone();
    let injector = ScriptInjector::with_listener(move |event| {
        let _ = app.emit("extension-executed", &event);
    });
    let report = injector.inject(&extensions, webview);
    log::debug!(
        "Injected {}/{} extension(s) into {}",
        report.dispatched(),
        report.outcomes.len(),
        label
    );

    let language = webview.state::<SettingsState>().language();
    for (outcome, error) in report.failures() {
        let payload = ExtensionErrorPayload {
            tab: label.clone(),
            id: outcome.id.clone(),
            name: outcome.name.clone(),
            error: error.clone(),
            notice: i18n::injection_error_notice(&outcome.name, error, language),
        };
        let _ = webview.emit("extension-error", payload);
    }
}
