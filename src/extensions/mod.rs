#[cfg(feature = "desktop")]
pub mod commands;
pub mod injector;
pub mod model;
pub mod storage;

pub use injector::{InjectionReport, PageContext, ScriptInjector};
pub use model::{ExtensionDescriptor, ExtensionId, MoveDirection};
pub use storage::ExtensionStore;
