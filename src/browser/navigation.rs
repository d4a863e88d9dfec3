use url::Url;

use crate::common::error::TabError;

/// Turn address-bar input into a loadable URL. Input without an http(s)
/// scheme is treated as a plain http address.
pub fn normalize_url(input: &str) -> Result<Url, TabError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TabError::InvalidUrl {
            input: input.to_string(),
            reason: "empty address".to_string(),
        });
    }

    let lower = trimmed.to_ascii_lowercase();
    let candidate = if lower.starts_with("http://") || lower.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    Url::parse(&candidate).map_err(|e| TabError::InvalidUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Tab strip title for a page: its host, or the whole URL when there is none.
pub fn display_title(url: &Url) -> String {
    match url.host_str() {
        Some(host) if !host.is_empty() => host.to_string(),
        _ => url.to_string(),
    }
}

/// Page title from the JSON answer to evaluating `document.title`. Blank
/// titles yield `None` so the host-based title stays.
pub fn page_title_from_eval(raw: &str) -> Option<String> {
    let title = serde_json::from_str::<String>(raw.trim()).ok()?;
    let title = title.trim();
    if title.is_empty() {
        None
    } else {
        Some(title.to_string())
    }
}

#[cfg(feature = "desktop")]
pub mod commands {
    use super::{display_title, normalize_url};
    use crate::browser::commands::{active_webview, BrowserState};
    use crate::browser::tabs::TabInfo;
    use crate::common::error::TabError;
    use crate::config::commands::SettingsState;
    use crate::i18n::{self, Notice};
    use tauri::{AppHandle, Emitter, State};

    #[tauri::command]
    pub fn navigate(
        input: String,
        app: AppHandle,
        browser: State<'_, BrowserState>,
        settings: State<'_, SettingsState>,
    ) -> Result<TabInfo, Notice> {
        let language = settings.language();
        let notice = |e: TabError| i18n::tab_error_notice(&e, language);

        let url = normalize_url(&input).map_err(notice)?;
        let webview = active_webview(&app, &browser).map_err(notice)?;
        webview
            .navigate(url.clone())
            .map_err(|e| notice(TabError::Webview(e.to_string())))?;

        let mut tabs = browser
            .tabs
            .lock()
            .map_err(|e| notice(TabError::Webview(e.to_string())))?;
        let tab = tabs
            .update(webview.label(), Some(url.as_str()), Some(&display_title(&url)))
            .map_err(notice)?
            .clone();
        let _ = app.emit("tab-updated", &tab);
        Ok(tab)
    }

    #[tauri::command]
    pub fn go_back(app: AppHandle, browser: State<'_, BrowserState>) -> Result<(), String> {
        let webview = active_webview(&app, &browser).map_err(|e| e.to_string())?;
        webview
            .eval("window.history.back()")
            .map_err(|e| e.to_string())
    }

    #[tauri::command]
    pub fn go_forward(app: AppHandle, browser: State<'_, BrowserState>) -> Result<(), String> {
        let webview = active_webview(&app, &browser).map_err(|e| e.to_string())?;
        webview
            .eval("window.history.forward()")
            .map_err(|e| e.to_string())
    }

    #[tauri::command]
    pub fn reload(app: AppHandle, browser: State<'_, BrowserState>) -> Result<(), String> {
        let webview = active_webview(&app, &browser).map_err(|e| e.to_string())?;
        webview.reload().map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("example.com", "http://example.com/")]
    #[case("  example.com/path?q=1  ", "http://example.com/path?q=1")]
    #[case("https://example.com", "https://example.com/")]
    #[case("HTTPS://Example.com/a", "https://example.com/a")]
    #[case("http://localhost:8080", "http://localhost:8080/")]
    fn test_normalize_url(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_url(input).unwrap().as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("http://")]
    fn test_normalize_rejects(#[case] input: &str) {
        assert!(matches!(
            normalize_url(input),
            Err(TabError::InvalidUrl { .. })
        ));
    }

    #[rstest]
    #[case(r#""DuckDuckGo - Privacy""#, Some("DuckDuckGo - Privacy"))]
    #[case(r#""  Padded  ""#, Some("Padded"))]
    #[case(r#""""#, None)]
    #[case("null", None)]
    #[case("", None)]
    fn test_page_title_from_eval(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(page_title_from_eval(raw).as_deref(), expected);
    }

    #[test]
    fn test_display_title() {
        let url = Url::parse("https://duckduckgo.com/?q=rust").unwrap();
        assert_eq!(display_title(&url), "duckduckgo.com");

        let url = Url::parse("about:blank").unwrap();
        assert_eq!(display_title(&url), "about:blank");
    }
}
