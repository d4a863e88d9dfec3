use serde::Serialize;

use crate::common::error::TabError;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct TabInfo {
    pub label: String,
    pub url: String,
    pub title: String,
}

/// Open tabs in strip order plus the active one. Webviews are keyed by label.
#[derive(Debug, Default)]
pub struct TabRegistry {
    tabs: Vec<TabInfo>,
    active: Option<String>,
    next_seq: u64,
}

impl TabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a fresh webview label.
    pub fn allocate_label(&mut self) -> String {
        self.next_seq += 1;
        format!("tab-{}", self.next_seq)
    }

    /// Add a tab and make it active. Returns the previously active label.
    pub fn insert(&mut self, tab: TabInfo) -> Option<String> {
        let label = tab.label.clone();
        self.tabs.push(tab);
        self.active.replace(label)
    }

    pub fn tabs(&self) -> &[TabInfo] {
        &self.tabs
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<&TabInfo> {
        self.tabs.iter().find(|t| t.label == label)
    }

    pub fn active_label(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&TabInfo> {
        self.active_label().and_then(|label| self.get(label))
    }

    fn index_of(&self, label: &str) -> Result<usize, TabError> {
        self.tabs
            .iter()
            .position(|t| t.label == label)
            .ok_or_else(|| TabError::NotFound(label.to_string()))
    }

    /// Make `label` active. Returns the previously active label, if different.
    pub fn activate(&mut self, label: &str) -> Result<Option<String>, TabError> {
        self.index_of(label)?;
        if self.active.as_deref() == Some(label) {
            return Ok(None);
        }
        Ok(self.active.replace(label.to_string()))
    }

    /// Close a tab. The last remaining tab cannot be closed. When the active
    /// tab goes, its right neighbour (or left, at the end) becomes active and
    /// is returned.
    pub fn close(&mut self, label: &str) -> Result<Option<String>, TabError> {
        let index = self.index_of(label)?;
        if self.tabs.len() <= 1 {
            return Err(TabError::LastTab);
        }

        self.tabs.remove(index);
        if self.active.as_deref() != Some(label) {
            return Ok(None);
        }

        let next = index.min(self.tabs.len() - 1);
        let next_label = self.tabs[next].label.clone();
        self.active = Some(next_label.clone());
        Ok(Some(next_label))
    }

    pub fn update(
        &mut self,
        label: &str,
        url: Option<&str>,
        title: Option<&str>,
    ) -> Result<&TabInfo, TabError> {
        let index = self.index_of(label)?;
        let tab = &mut self.tabs[index];
        if let Some(url) = url {
            tab.url = url.to_string();
        }
        if let Some(title) = title {
            tab.title = title.to_string();
        }
        Ok(&self.tabs[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open(registry: &mut TabRegistry, url: &str) -> String {
        let label = registry.allocate_label();
        registry.insert(TabInfo {
            label: label.clone(),
            url: url.to_string(),
            title: "New Tab".to_string(),
        });
        label
    }

    #[test]
    fn test_insert_activates_new_tab() {
        let mut registry = TabRegistry::new();
        let first = open(&mut registry, "https://duckduckgo.com");
        assert_eq!(registry.active_label(), Some(first.as_str()));

        let label = registry.allocate_label();
        let previous = registry.insert(TabInfo {
            label: label.clone(),
            url: "https://example.com".into(),
            title: "New Tab".into(),
        });
        assert_eq!(previous, Some(first));
        assert_eq!(registry.active().map(|t| t.url.as_str()), Some("https://example.com"));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_labels_are_unique_after_close() {
        let mut registry = TabRegistry::new();
        let a = open(&mut registry, "a");
        let b = open(&mut registry, "b");
        registry.close(&b).unwrap();
        let c = open(&mut registry, "c");
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_last_tab_cannot_close() {
        let mut registry = TabRegistry::new();
        let only = open(&mut registry, "a");
        assert_eq!(registry.close(&only), Err(TabError::LastTab));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.active_label(), Some(only.as_str()));
    }

    #[test]
    fn test_closing_active_picks_neighbour() {
        let mut registry = TabRegistry::new();
        let a = open(&mut registry, "a");
        let b = open(&mut registry, "b");
        let c = open(&mut registry, "c");

        registry.activate(&b).unwrap();
        assert_eq!(registry.close(&b).unwrap(), Some(c.clone()));

        // Closing the active last tab moves left.
        assert_eq!(registry.close(&c).unwrap(), Some(a.clone()));
        assert_eq!(registry.active_label(), Some(a.as_str()));
    }

    #[test]
    fn test_closing_inactive_keeps_active() {
        let mut registry = TabRegistry::new();
        let a = open(&mut registry, "a");
        let b = open(&mut registry, "b");
        assert_eq!(registry.close(&a).unwrap(), None);
        assert_eq!(registry.active_label(), Some(b.as_str()));
    }

    #[test]
    fn test_activate_unknown_and_same() {
        let mut registry = TabRegistry::new();
        let a = open(&mut registry, "a");
        assert_eq!(
            registry.activate("tab-99"),
            Err(TabError::NotFound("tab-99".to_string()))
        );
        assert_eq!(registry.activate(&a).unwrap(), None);
    }

    #[test]
    fn test_update_tab() {
        let mut registry = TabRegistry::new();
        let a = open(&mut registry, "a");
        let tab = registry
            .update(&a, Some("https://example.com/"), Some("example.com"))
            .unwrap();
        assert_eq!(tab.url, "https://example.com/");
        assert_eq!(tab.title, "example.com");

        let tab = registry.update(&a, None, Some("Example")).unwrap();
        assert_eq!(tab.url, "https://example.com/");
        assert_eq!(tab.title, "Example");
    }
}
