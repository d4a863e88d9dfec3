use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Stable identifier assigned to a descriptor when it is imported.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ExtensionId(String);

impl ExtensionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ExtensionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ExtensionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for ExtensionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of the persisted extension list.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExtensionDescriptor {
    // Older documents carry no id; one is assigned when they are loaded.
    #[serde(default = "ExtensionId::generate")]
    pub id: ExtensionId,
    pub name: String,
    pub script: PathBuf,
    pub enabled: bool,
}

/// Validated content of a descriptor file chosen for import.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtensionManifest {
    pub name: String,
    pub script: PathBuf,
    pub enabled: bool,
}

impl ExtensionManifest {
    pub fn into_descriptor(self) -> ExtensionDescriptor {
        ExtensionDescriptor {
            id: ExtensionId::generate(),
            name: self.name,
            script: self.script,
            enabled: self.enabled,
        }
    }
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_without_id_gets_one() {
        let desc: ExtensionDescriptor =
            serde_json::from_str(r#"{"name": "a", "script": "/tmp/a.js", "enabled": true}"#)
                .unwrap();
        assert!(!desc.id.as_str().is_empty());
        assert!(desc.enabled);
    }

    #[test]
    fn test_descriptor_keeps_existing_id() {
        let desc: ExtensionDescriptor = serde_json::from_str(
            r#"{"id": "fixed", "name": "a", "script": "/tmp/a.js", "enabled": false}"#,
        )
        .unwrap();
        assert_eq!(desc.id, ExtensionId::from("fixed"));

        let json = serde_json::to_value(&desc).unwrap();
        assert_eq!(json["id"], "fixed");
        assert_eq!(json["script"], "/tmp/a.js");
    }

    #[test]
    fn test_descriptor_requires_all_fields() {
        let result =
            serde_json::from_str::<ExtensionDescriptor>(r#"{"name": "a", "enabled": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_generated_ids_differ() {
        assert_ne!(ExtensionId::generate(), ExtensionId::generate());
    }
}
