use serde::Serialize;
use thiserror::Error;

/// Common application errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors from the persisted extension list
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed extension document: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Extension not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extension list {0} could not be read; reload it before making changes")]
    NotLoaded(String),

    #[error("Index {index} is out of range for {len} extension(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors raised while importing a descriptor file
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read descriptor file: {0}")]
    Io(#[from] std::io::Error),

    #[error("The file is not a valid JSON object: {0}")]
    NotJson(String),

    #[error("Missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    #[error("The script file path is invalid: {0}")]
    ScriptPathInvalid(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-descriptor failures while injecting into a page
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum InjectionError {
    #[error("Failed to read script {path}: {reason}")]
    ScriptReadFailure { path: String, reason: String },

    #[error("Script execution failed: {0}")]
    ScriptExecutionFailure(String),
}

/// Tab and navigation errors
#[derive(Debug, Error, PartialEq)]
pub enum TabError {
    #[error("Cannot close the last tab")]
    LastTab,

    #[error("Tab not found: {0}")]
    NotFound(String),

    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("Webview error: {0}")]
    Webview(String),
}

/// Helper trait for converting errors to Tauri-compatible String errors
pub trait ToTauriError {
    fn to_tauri_error(self) -> String;
}

impl<E: std::error::Error> ToTauriError for E {
    fn to_tauri_error(self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_lists_every_field() {
        let err = ImportError::MissingFields(vec!["script".into(), "enabled".into()]);
        assert_eq!(err.to_string(), "Missing required field(s): script, enabled");
    }

    #[test]
    fn test_store_error_wraps_into_import_error() {
        let err: ImportError = StoreError::NotFound("abc".into()).into();
        assert_eq!(err.to_tauri_error(), "Extension not found: abc");
    }

    #[test]
    fn test_injection_error_serializes_with_kind() {
        let err = InjectionError::ScriptExecutionFailure("boom".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "ScriptExecutionFailure");
        assert_eq!(json["detail"], "boom");
    }
}
