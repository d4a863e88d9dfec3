#[cfg(feature = "desktop")]
pub mod commands;
pub mod downloads;
pub mod navigation;
#[cfg(feature = "desktop")]
pub mod page;
pub mod tabs;

pub use navigation::{display_title, normalize_url};
pub use tabs::{TabInfo, TabRegistry};
