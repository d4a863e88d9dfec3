//! Runs enabled extension scripts inside a loaded page.
//!
//! Each enabled descriptor is read and dispatched in list order. Read and
//! dispatch failures are recorded per descriptor and never stop the remaining
//! injections. Completion results come back later through the page's callback
//! and are only observed (logged and forwarded to an optional listener).

use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::sync::Arc;

use super::model::{ExtensionDescriptor, ExtensionId};
use crate::common::error::InjectionError;
use crate::logging;

/// Receives the page's answer to one execution request.
pub type CompletionCallback = Box<dyn FnOnce(Result<Value, String>) + Send + 'static>;

/// A loaded page's scripting context.
pub trait PageContext {
    /// Short name for log lines (tab label, window title...)
    fn describe(&self) -> String;

    /// Submit `script` for execution. `Err` means the request was never
    /// accepted; otherwise `on_complete` fires once the page has run it.
    fn execute(&self, script: String, on_complete: CompletionCallback) -> Result<(), String>;
}

const ERROR_KEY: &str = "__freenetixError";

/// Wrap a script so a thrown exception becomes its completion value instead of
/// aborting evaluation. Top-level `let`/`const` in the script become block
/// scoped.
pub fn wrap_for_completion(source: &str) -> String {
    format!(
        concat!(
            "try {{\n{}\n}} catch (__fxErr) {{\n",
            "  ({{ \"{}\": String((__fxErr && __fxErr.stack) || __fxErr) }});\n",
            "}}"
        ),
        source, ERROR_KEY
    )
}

/// Decode the JSON completion value of a script wrapped by
/// [`wrap_for_completion`]. An empty answer is `undefined`.
pub fn parse_completion(raw: &str) -> Result<Value, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) if map.contains_key(ERROR_KEY) => Err(match &map[ERROR_KEY] {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        }),
        Ok(value) => Ok(value),
        Err(_) => Ok(Value::String(raw.to_string())),
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "status", content = "error", rename_all = "lowercase")]
pub enum InjectionStatus {
    Dispatched,
    Failed(InjectionError),
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct InjectionOutcome {
    pub id: ExtensionId,
    pub name: String,
    pub status: InjectionStatus,
}

/// One outcome per enabled descriptor, in injection order.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct InjectionReport {
    pub outcomes: Vec<InjectionOutcome>,
}

impl InjectionReport {
    pub fn dispatched(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == InjectionStatus::Dispatched)
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&InjectionOutcome, &InjectionError)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            InjectionStatus::Failed(err) => Some((o, err)),
            InjectionStatus::Dispatched => None,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

/// Completion of one dispatched script.
#[derive(Serialize, Clone, Debug)]
pub struct ExecutionEvent {
    pub id: ExtensionId,
    pub name: String,
    pub page: String,
    pub result: Result<Value, InjectionError>,
}

type Listener = Arc<dyn Fn(ExecutionEvent) + Send + Sync>;

#[derive(Default, Clone)]
pub struct ScriptInjector {
    listener: Option<Listener>,
}

impl ScriptInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward every completion to `listener` in addition to logging it.
    pub fn with_listener<F>(listener: F) -> Self
    where
        F: Fn(ExecutionEvent) + Send + Sync + 'static,
    {
        Self {
            listener: Some(Arc::new(listener)),
        }
    }

    pub fn inject<C>(&self, extensions: &[ExtensionDescriptor], page: &C) -> InjectionReport
    where
        C: PageContext + ?Sized,
    {
        let page_name = page.describe();
        let outcomes = extensions
            .iter()
            .filter(|ext| ext.enabled)
            .map(|ext| {
                let status = match self.inject_one(ext, page, &page_name) {
                    Ok(()) => InjectionStatus::Dispatched,
                    Err(err) => {
                        log::warn!(
                            "Failed to inject script '{}' into {}: {}",
                            ext.name,
                            page_name,
                            err
                        );
                        let _ = logging::write_domain_log(
                            "extension",
                            &format!("'{}' on {}: {}", ext.name, page_name, err),
                        );
                        InjectionStatus::Failed(err)
                    }
                };
                InjectionOutcome {
                    id: ext.id.clone(),
                    name: ext.name.clone(),
                    status,
                }
            })
            .collect();

        InjectionReport { outcomes }
    }

    fn inject_one<C>(
        &self,
        ext: &ExtensionDescriptor,
        page: &C,
        page_name: &str,
    ) -> Result<(), InjectionError>
    where
        C: PageContext + ?Sized,
    {
        let source =
            fs::read_to_string(&ext.script).map_err(|e| InjectionError::ScriptReadFailure {
                path: ext.script.to_string_lossy().to_string(),
                reason: e.to_string(),
            })?;

        let id = ext.id.clone();
        let name = ext.name.clone();
        let page_label = page_name.to_string();
        let listener = self.listener.clone();
        let on_complete: CompletionCallback = Box::new(move |result| {
            let result = result.map_err(InjectionError::ScriptExecutionFailure);
            match &result {
                Ok(value) => {
                    log::info!("Script '{}' executed on {}: {}", name, page_label, value);
                    let _ = logging::write_domain_log(
                        "extension",
                        &format!("Script '{}' executed on {}: {}", name, page_label, value),
                    );
                }
                Err(err) => {
                    log::warn!("Script '{}' failed on {}: {}", name, page_label, err);
                    let _ = logging::write_domain_log(
                        "extension",
                        &format!("Script '{}' failed on {}: {}", name, page_label, err),
                    );
                }
            }
            if let Some(listener) = listener {
                listener(ExecutionEvent {
                    id,
                    name,
                    page: page_label,
                    result,
                });
            }
        });

        page.execute(source, on_complete)
            .map_err(InjectionError::ScriptExecutionFailure)
    }
}
