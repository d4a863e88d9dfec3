use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SystemInfo {
    pub version: String,
    pub platform: String,
    pub arch: String,
    pub engine: String,
    pub build_date: String,
}

impl SystemInfo {
    pub fn current() -> Self {
        let platform = match std::env::consts::OS {
            "windows" => "Windows",
            "macos" => "macOS",
            "linux" => "Linux",
            _ => std::env::consts::OS,
        };

        let arch = match std::env::consts::ARCH {
            "x86_64" => "x64",
            "aarch64" => "ARM64",
            _ => std::env::consts::ARCH,
        };

        SystemInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            platform: platform.to_string(),
            arch: arch.to_string(),
            engine: "system webview".to_string(),
            build_date: env!("FREENETIX_BUILD_DATE").to_string(),
        }
    }
}

#[cfg(feature = "desktop")]
#[tauri::command]
pub fn get_system_info() -> SystemInfo {
    SystemInfo::current()
}
