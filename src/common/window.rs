/// Label of the main browser window and of its toolbar webview.
pub const MAIN_WINDOW: &str = "main";
pub const EXTENSIONS_WINDOW: &str = "extensions";
pub const SETTINGS_WINDOW: &str = "settings";

/// Height of the toolbar strip (tab bar + navigation row) in logical pixels.
pub const TOOLBAR_HEIGHT: f64 = 84.0;

/// Where tab webviews sit inside the main window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabLayout {
    pub toolbar_height: f64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

pub fn calculate_layout(width: f64, height: f64) -> TabLayout {
    let toolbar_height = TOOLBAR_HEIGHT.min(height.max(0.0));
    TabLayout {
        toolbar_height,
        x: 0.0,
        y: toolbar_height,
        width: width.max(0.0),
        height: (height - toolbar_height).max(0.0),
    }
}

#[cfg(feature = "desktop")]
pub mod desktop {
    use super::{calculate_layout, TabLayout, EXTENSIONS_WINDOW, MAIN_WINDOW, SETTINGS_WINDOW};
    use crate::config::commands::SettingsState;
    use tauri::window::WindowBuilder;
    use tauri::{
        AppHandle, LogicalPosition, LogicalSize, Manager, Runtime, State, WebviewBuilder,
        WebviewUrl, WebviewWindowBuilder, Window,
    };

    impl TabLayout {
        pub fn position(&self) -> LogicalPosition<f64> {
            LogicalPosition::new(self.x, self.y)
        }

        pub fn size(&self) -> LogicalSize<f64> {
            LogicalSize::new(self.width, self.height)
        }
    }

    pub fn window_layout<R: Runtime>(window: &Window<R>) -> tauri::Result<TabLayout> {
        let size = window.inner_size()?;
        let scale_factor = window.scale_factor()?;
        let logical = size.to_logical::<f64>(scale_factor);
        Ok(calculate_layout(logical.width, logical.height))
    }

    /// Create the main window with the toolbar webview across its top. Tabs
    /// are added to it later as further child webviews.
    pub fn build_main_window<R: Runtime, M: Manager<R>>(
        manager: &M,
        title: &str,
    ) -> tauri::Result<Window<R>> {
        let window = WindowBuilder::new(manager, MAIN_WINDOW)
            .title(title)
            .inner_size(1200.0, 800.0)
            .min_inner_size(480.0, 320.0)
            .build()?;
        let layout = window_layout(&window)?;
        window.add_child(
            WebviewBuilder::new(MAIN_WINDOW, WebviewUrl::App("index.html".into())),
            LogicalPosition::new(0.0, 0.0),
            LogicalSize::new(layout.width, layout.toolbar_height),
        )?;
        Ok(window)
    }

    /// Shrink the toolbar webview to its strip and fit every tab below it.
    pub fn relayout_tabs<R: Runtime>(window: &Window<R>) {
        let layout = match window_layout(window) {
            Ok(layout) => layout,
            Err(e) => {
                log::warn!("Failed to read window size: {}", e);
                return;
            }
        };

        for webview in window.webviews() {
            if webview.label() == MAIN_WINDOW {
                let _ = webview.set_position(LogicalPosition::new(0.0, 0.0));
                let _ = webview.set_size(LogicalSize::new(layout.width, layout.toolbar_height));
            } else {
                let _ = webview.set_position(layout.position());
                let _ = webview.set_size(layout.size());
            }
        }
    }

    /// Open (or focus) a dialog window showing one of the bundled pages.
    pub fn open_dialog_window<R: Runtime>(
        app: &AppHandle<R>,
        label: &str,
        page: &str,
        title: &str,
        size: (f64, f64),
    ) -> Result<(), String> {
        if let Some(existing) = app.get_webview_window(label) {
            let _ = existing.unminimize();
            return existing.set_focus().map_err(|e| e.to_string());
        }

        WebviewWindowBuilder::new(app, label, WebviewUrl::App(page.into()))
            .title(title)
            .inner_size(size.0, size.1)
            .resizable(true)
            .build()
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    #[tauri::command]
    pub async fn open_extension_manager(
        app: AppHandle,
        settings: State<'_, SettingsState>,
    ) -> Result<(), String> {
        let title = settings
            .language()
            .translate("Manage Extensions", "Gerenciar Extensões");
        open_dialog_window(&app, EXTENSIONS_WINDOW, "extensions.html", title, (420.0, 480.0))
    }

    #[tauri::command]
    pub async fn open_settings(
        app: AppHandle,
        settings: State<'_, SettingsState>,
    ) -> Result<(), String> {
        let title = settings.language().translate("Settings", "Configurações");
        open_dialog_window(&app, SETTINGS_WINDOW, "settings.html", title, (320.0, 200.0))
    }
}
