use super::model::{ExtensionDescriptor, ExtensionId, ExtensionManifest, MoveDirection};
use crate::common::error::{ImportError, StoreError};
use crate::logging;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub const STORE_FILE_NAME: &str = "extensions.json";

const REQUIRED_FIELDS: [&str; 3] = ["name", "script", "enabled"];

/// Load the extension document. An absent file is an empty list; a malformed
/// one is an error.
pub fn load_extensions(path: &Path) -> Result<Vec<ExtensionDescriptor>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| StoreError::Parse(e.to_string()))
}

/// Overwrite the extension document with the full list.
pub fn save_extensions(path: &Path, extensions: &[ExtensionDescriptor]) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(extensions)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;

    // Write beside the target and rename so a crash never leaves half a document.
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Parse and validate a descriptor file without touching the store.
pub fn read_descriptor_file(path: &Path) -> Result<ExtensionManifest, ImportError> {
    let content = fs::read_to_string(path)?;
    let value: Value =
        serde_json::from_str(&content).map_err(|e| ImportError::NotJson(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| ImportError::NotJson("expected a JSON object".to_string()))?;

    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !object.contains_key(**field))
        .map(|field| field.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingFields(missing));
    }

    let name = object["name"]
        .as_str()
        .map(str::trim)
        .ok_or_else(|| invalid_field("name", "expected a string"))?;
    if name.is_empty() {
        return Err(invalid_field("name", "must not be empty"));
    }
    let script = object["script"]
        .as_str()
        .ok_or_else(|| invalid_field("script", "expected a string"))?;
    let enabled = object["enabled"]
        .as_bool()
        .ok_or_else(|| invalid_field("enabled", "expected true or false"))?;

    let script = resolve_script_path(path, script);
    if !script.is_file() {
        return Err(ImportError::ScriptPathInvalid(
            script.to_string_lossy().to_string(),
        ));
    }

    Ok(ExtensionManifest {
        name: name.to_string(),
        script,
        enabled,
    })
}

fn invalid_field(field: &str, reason: &str) -> ImportError {
    ImportError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// `extensions.json.bak`, or a timestamped name when that is taken.
fn backup_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| STORE_FILE_NAME.to_string());
    let backup = path.with_file_name(format!("{}.bak", file_name));
    if !backup.exists() {
        return backup;
    }
    let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S%.3f");
    path.with_file_name(format!("{}.{}.bak", file_name, stamp))
}

/// Relative script paths are taken from the descriptor file's directory.
fn resolve_script_path(descriptor_path: &Path, script: &str) -> PathBuf {
    let script = PathBuf::from(script);
    if script.is_absolute() {
        return script;
    }
    match descriptor_path.parent() {
        Some(dir) => dir.join(script),
        None => script,
    }
}

/// The ordered extension list and the document it is persisted to.
pub struct ExtensionStore {
    path: PathBuf,
    extensions: Vec<ExtensionDescriptor>,
    // False until the document has been read; mutations are refused meanwhile.
    loaded: bool,
}

impl ExtensionStore {
    /// Open the store at `path`, creating its directory if needed
    pub fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let extensions = load_extensions(&path)?;
        Ok(Self {
            path,
            extensions,
            loaded: true,
        })
    }

    /// Like `open`, but a document that does not parse is renamed to a backup
    /// beside it and the store starts empty. Returns the backup path, if any.
    pub fn open_or_recover(path: PathBuf) -> Result<(Self, Option<PathBuf>), StoreError> {
        match Self::open(path.clone()) {
            Ok(store) => Ok((store, None)),
            Err(StoreError::Parse(reason)) => {
                let backup = backup_path(&path);
                fs::rename(&path, &backup)?;
                log::warn!(
                    "Malformed extension document {:?} ({}), moved to {:?}",
                    path,
                    reason,
                    backup
                );
                let _ = logging::write_domain_log(
                    "audit",
                    &format!(
                        "Moved unreadable extension list {} to {}",
                        path.display(),
                        backup.display()
                    ),
                );
                Ok((Self::empty(path), Some(backup)))
            }
            Err(e) => Err(e),
        }
    }

    /// Location of the document in the application data directory
    pub fn default_path() -> Result<PathBuf, StoreError> {
        let data_dir =
            crate::config::get_data_dir().map_err(|e| StoreError::Config(e.to_string()))?;
        Ok(data_dir.join(STORE_FILE_NAME))
    }

    /// Open the store in the application data directory
    pub fn from_config() -> Result<Self, StoreError> {
        Self::open(Self::default_path()?)
    }

    /// An empty store bound to `path`. The first mutation overwrites whatever
    /// document is there.
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            extensions: Vec::new(),
            loaded: true,
        }
    }

    /// An empty store for a document that could not be read. It refuses every
    /// mutation until a `reload` succeeds.
    pub fn unloaded(path: PathBuf) -> Self {
        Self {
            path,
            extensions: Vec::new(),
            loaded: false,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extensions(&self) -> &[ExtensionDescriptor] {
        &self.extensions
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn get(&self, id: &ExtensionId) -> Option<&ExtensionDescriptor> {
        self.extensions.iter().find(|e| &e.id == id)
    }

    /// Enabled descriptors in injection order
    pub fn enabled(&self) -> Vec<ExtensionDescriptor> {
        self.extensions.iter().filter(|e| e.enabled).cloned().collect()
    }

    /// Replace the in-memory list with the document on disk
    pub fn reload(&mut self) -> Result<(), StoreError> {
        self.extensions = load_extensions(&self.path)?;
        self.loaded = true;
        Ok(())
    }

    pub fn save(&self) -> Result<(), StoreError> {
        if !self.loaded {
            return Err(StoreError::NotLoaded(self.path.to_string_lossy().to_string()));
        }
        save_extensions(&self.path, &self.extensions)
    }

    /// Persist `next`, then adopt it. On a failed write memory stays as it was.
    fn commit(&mut self, next: Vec<ExtensionDescriptor>) -> Result<(), StoreError> {
        if !self.loaded {
            return Err(StoreError::NotLoaded(self.path.to_string_lossy().to_string()));
        }
        save_extensions(&self.path, &next)?;
        self.extensions = next;
        Ok(())
    }

    fn position(&self, id: &ExtensionId) -> Result<usize, StoreError> {
        self.extensions
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index >= self.extensions.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.extensions.len(),
            });
        }
        Ok(())
    }

    /// Validate the descriptor file at `path`, append it and persist the list
    pub fn import_from_file(&mut self, path: &Path) -> Result<ExtensionDescriptor, ImportError> {
        let descriptor = read_descriptor_file(path)?.into_descriptor();

        let mut next = self.extensions.clone();
        next.push(descriptor.clone());
        self.commit(next)?;

        log::info!(
            "Imported extension '{}' ({}) from {:?}",
            descriptor.name,
            descriptor.id,
            path
        );
        Ok(descriptor)
    }

    pub fn remove(&mut self, id: &ExtensionId) -> Result<ExtensionDescriptor, StoreError> {
        let index = self.position(id)?;
        self.remove_at(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Result<ExtensionDescriptor, StoreError> {
        self.check_index(index)?;
        let mut next = self.extensions.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    /// Flip the enabled flag, returning the new value
    pub fn toggle(&mut self, id: &ExtensionId) -> Result<bool, StoreError> {
        let index = self.position(id)?;
        self.toggle_at(index)
    }

    pub fn toggle_at(&mut self, index: usize) -> Result<bool, StoreError> {
        self.check_index(index)?;
        let enabled = !self.extensions[index].enabled;
        self.write_enabled(index, enabled)?;
        Ok(enabled)
    }

    pub fn set_enabled(&mut self, id: &ExtensionId, enabled: bool) -> Result<(), StoreError> {
        let index = self.position(id)?;
        if self.extensions[index].enabled == enabled {
            return Ok(());
        }
        self.write_enabled(index, enabled)
    }

    fn write_enabled(&mut self, index: usize, enabled: bool) -> Result<(), StoreError> {
        let mut next = self.extensions.clone();
        next[index].enabled = enabled;
        self.commit(next)
    }

    /// Move an extension one step in injection order
    pub fn move_extension(
        &mut self,
        id: &ExtensionId,
        direction: MoveDirection,
    ) -> Result<(), StoreError> {
        let pos = self.position(id)?;
        let target = match direction {
            MoveDirection::Up if pos > 0 => pos - 1,
            MoveDirection::Down if pos + 1 < self.extensions.len() => pos + 1,
            _ => return Ok(()),
        };

        let mut next = self.extensions.clone();
        next.swap(pos, target);
        self.commit(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "document.body.dataset.touched = 'yes';").unwrap();
        path
    }

    fn write_descriptor(dir: &Path, file: &str, body: &str) -> PathBuf {
        let path = dir.join(file);
        fs::write(&path, body).unwrap();
        path
    }

    fn valid_descriptor(dir: &Path, name: &str) -> PathBuf {
        let script = write_script(dir, &format!("{}.js", name));
        let body = serde_json::json!({
            "name": name,
            "script": script,
            "enabled": true,
        });
        write_descriptor(dir, &format!("{}.json", name), &body.to_string())
    }

    fn store_in(temp: &TempDir) -> ExtensionStore {
        ExtensionStore::open(temp.path().join("data").join(STORE_FILE_NAME)).unwrap()
    }

    #[test]
    fn test_absent_document_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);
        assert!(store.is_empty());
        assert!(load_extensions(store.path()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(STORE_FILE_NAME);
        fs::write(&path, "[{\"name\": ").unwrap();
        assert!(matches!(load_extensions(&path), Err(StoreError::Parse(_))));
        assert!(ExtensionStore::open(path).is_err());
    }

    #[test]
    fn test_empty_store_leaves_document_alone() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(STORE_FILE_NAME);
        fs::write(&path, "not a list").unwrap();

        let store = ExtensionStore::empty(path.clone());
        assert!(store.is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "not a list");
    }

    #[test]
    fn test_import_appends_and_persists() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        let before = load_extensions(store.path()).unwrap().len();

        let descriptor = store
            .import_from_file(&valid_descriptor(temp.path(), "dark-mode"))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(descriptor.name, "dark-mode");
        assert!(descriptor.enabled);

        let on_disk = load_extensions(store.path()).unwrap();
        assert_eq!(on_disk.len(), before + 1);
        assert_eq!(on_disk[0], descriptor);
    }

    #[rstest]
    #[case::no_name(r#"{"script": "a.js", "enabled": true}"#, vec!["name"])]
    #[case::no_script(r#"{"name": "a", "enabled": true}"#, vec!["script"])]
    #[case::no_enabled(r#"{"name": "a", "script": "a.js"}"#, vec!["enabled"])]
    #[case::empty_object("{}", vec!["name", "script", "enabled"])]
    fn test_import_missing_fields_changes_nothing(
        #[case] body: &str,
        #[case] expected: Vec<&str>,
    ) {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "a.js");
        let mut store = store_in(&temp);
        store
            .import_from_file(&valid_descriptor(temp.path(), "existing"))
            .unwrap();
        let document_before = fs::read_to_string(store.path()).unwrap();

        let path = write_descriptor(temp.path(), "broken.json", body);
        match store.import_from_file(&path) {
            Err(ImportError::MissingFields(fields)) => assert_eq!(fields, expected),
            other => panic!("expected MissingFields, got {:?}", other),
        }

        assert_eq!(store.len(), 1);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), document_before);
    }

    #[test]
    fn test_import_not_json() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        let path = write_descriptor(temp.path(), "bad.json", "this is not json");
        assert!(matches!(
            store.import_from_file(&path),
            Err(ImportError::NotJson(_))
        ));

        let path = write_descriptor(temp.path(), "array.json", "[1, 2]");
        assert!(matches!(
            store.import_from_file(&path),
            Err(ImportError::NotJson(_))
        ));
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_import_missing_script_changes_nothing() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);

        let path = write_descriptor(
            temp.path(),
            "ghost.json",
            r#"{"name": "ghost", "script": "does-not-exist.js", "enabled": true}"#,
        );
        assert!(matches!(
            store.import_from_file(&path),
            Err(ImportError::ScriptPathInvalid(_))
        ));
        assert!(store.is_empty());
    }

    #[rstest]
    #[case::empty_name(r#"{"name": "  ", "script": "a.js", "enabled": true}"#, "name")]
    #[case::numeric_name(r#"{"name": 3, "script": "a.js", "enabled": true}"#, "name")]
    #[case::string_enabled(r#"{"name": "a", "script": "a.js", "enabled": "yes"}"#, "enabled")]
    fn test_import_invalid_field(#[case] body: &str, #[case] bad_field: &str) {
        let temp = TempDir::new().unwrap();
        write_script(temp.path(), "a.js");
        let mut store = store_in(&temp);

        let path = write_descriptor(temp.path(), "odd.json", body);
        match store.import_from_file(&path) {
            Err(ImportError::InvalidField { field, .. }) => assert_eq!(field, bad_field),
            other => panic!("expected InvalidField, got {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[test]
    fn test_relative_script_resolves_beside_descriptor() {
        let temp = TempDir::new().unwrap();
        let ext_dir = temp.path().join("pack");
        fs::create_dir_all(&ext_dir).unwrap();
        write_script(&ext_dir, "inject.js");
        let path = write_descriptor(
            &ext_dir,
            "pack.json",
            r#"{"name": "pack", "script": "inject.js", "enabled": false}"#,
        );

        let manifest = read_descriptor_file(&path).unwrap();
        assert_eq!(manifest.script, ext_dir.join("inject.js"));
        assert!(!manifest.enabled);
    }

    #[test]
    fn test_remove_by_id_persists() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        let first = store
            .import_from_file(&valid_descriptor(temp.path(), "first"))
            .unwrap();
        let second = store
            .import_from_file(&valid_descriptor(temp.path(), "second"))
            .unwrap();

        let removed = store.remove(&first.id).unwrap();
        assert_eq!(removed.id, first.id);
        assert_eq!(store.len(), 1);

        let reloaded = load_extensions(store.path()).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].id, second.id);
        assert!(reloaded.iter().all(|e| e.id != first.id));
    }

    #[test]
    fn test_remove_at_valid_index_persists() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        let first = store
            .import_from_file(&valid_descriptor(temp.path(), "first"))
            .unwrap();
        let second = store
            .import_from_file(&valid_descriptor(temp.path(), "second"))
            .unwrap();

        let removed = store.remove_at(1).unwrap();
        assert_eq!(removed.id, second.id);
        assert_eq!(store.len(), 1);

        let reloaded = load_extensions(store.path()).unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded[0].id, first.id);
        assert!(reloaded.iter().all(|e| e.id != second.id));
    }

    #[test]
    fn test_failed_write_keeps_memory_unchanged() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        store
            .import_from_file(&valid_descriptor(temp.path(), "a"))
            .unwrap();
        let before = store.extensions().to_vec();

        // A directory where the document should be makes every save fail.
        fs::remove_file(store.path()).unwrap();
        fs::create_dir(store.path()).unwrap();

        assert!(store.toggle(&before[0].id).is_err());
        assert!(matches!(
            store.import_from_file(&valid_descriptor(temp.path(), "b")),
            Err(ImportError::Store(_))
        ));
        assert!(store.remove_at(0).is_err());
        assert_eq!(store.extensions(), before.as_slice());
    }

    #[test]
    fn test_malformed_document_is_moved_aside() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(STORE_FILE_NAME);
        let broken = r#"[
  {"id": "a", "name": "a", "script": "/tmp/a.js", "enabled": true},
  {"id": "b", "name": "b", "script": "/tmp/b.js", "enabled": false},
]"#;
        fs::write(&path, broken).unwrap();

        let (mut store, backup) = ExtensionStore::open_or_recover(path.clone()).unwrap();
        let backup = backup.expect("malformed document should be backed up");
        assert_eq!(backup, temp.path().join("extensions.json.bak"));
        assert_eq!(fs::read_to_string(&backup).unwrap(), broken);
        assert!(store.is_empty());

        store
            .import_from_file(&valid_descriptor(temp.path(), "c"))
            .unwrap();
        assert_eq!(load_extensions(&path).unwrap().len(), 1);
        // The user's entries survive in the backup.
        assert_eq!(fs::read_to_string(&backup).unwrap(), broken);
    }

    #[test]
    fn test_second_recovery_keeps_first_backup() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(STORE_FILE_NAME);
        fs::write(&path, "first broken").unwrap();
        let (_, first) = ExtensionStore::open_or_recover(path.clone()).unwrap();
        fs::write(&path, "second broken").unwrap();
        let (_, second) = ExtensionStore::open_or_recover(path.clone()).unwrap();

        let (first, second) = (first.unwrap(), second.unwrap());
        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(first).unwrap(), "first broken");
        assert_eq!(fs::read_to_string(second).unwrap(), "second broken");
    }

    #[test]
    fn test_unloaded_store_refuses_writes_until_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(STORE_FILE_NAME);
        fs::write(&path, "[]").unwrap();

        let mut store = ExtensionStore::unloaded(path.clone());
        assert!(!store.is_loaded());
        assert!(matches!(
            store.import_from_file(&valid_descriptor(temp.path(), "a")),
            Err(ImportError::Store(StoreError::NotLoaded(_)))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");

        store.reload().unwrap();
        store
            .import_from_file(&valid_descriptor(temp.path(), "a"))
            .unwrap();
        assert_eq!(load_extensions(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_recover_reads_good_document() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        store
            .import_from_file(&valid_descriptor(temp.path(), "a"))
            .unwrap();

        let (reopened, backup) =
            ExtensionStore::open_or_recover(store.path().to_path_buf()).unwrap();
        assert!(backup.is_none());
        assert_eq!(reopened.extensions(), store.extensions());
    }

    #[test]
    fn test_remove_unknown_id() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        assert!(matches!(
            store.remove(&ExtensionId::from("nope")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_index_out_of_range() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        assert!(matches!(
            store.remove_at(0),
            Err(StoreError::IndexOutOfRange { index: 0, len: 0 })
        ));

        store
            .import_from_file(&valid_descriptor(temp.path(), "only"))
            .unwrap();
        assert!(matches!(
            store.toggle_at(1),
            Err(StoreError::IndexOutOfRange { index: 1, len: 1 })
        ));
        assert_eq!(store.len(), 1);
        assert!(store.extensions()[0].enabled);
    }

    #[test]
    fn test_toggle_flips_only_enabled() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        store
            .import_from_file(&valid_descriptor(temp.path(), "a"))
            .unwrap();
        store
            .import_from_file(&valid_descriptor(temp.path(), "b"))
            .unwrap();
        let before = store.extensions().to_vec();

        let enabled = store.toggle(&before[1].id).unwrap();
        assert!(!enabled);

        let after = load_extensions(store.path()).unwrap();
        assert_eq!(after[0], before[0]);
        assert_eq!(after[1].id, before[1].id);
        assert_eq!(after[1].name, before[1].name);
        assert_eq!(after[1].script, before[1].script);
        assert!(!after[1].enabled);

        assert!(store.toggle_at(1).unwrap());
        assert!(store.extensions()[1].enabled);
    }

    #[test]
    fn test_enabled_snapshot_keeps_order() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        for name in ["one", "two", "three"] {
            store
                .import_from_file(&valid_descriptor(temp.path(), name))
                .unwrap();
        }
        let two = store.extensions()[1].id.clone();
        store.set_enabled(&two, false).unwrap();

        let names: Vec<String> = store.enabled().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["one", "three"]);
    }

    #[test]
    fn test_move_extension() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        for name in ["one", "two"] {
            store
                .import_from_file(&valid_descriptor(temp.path(), name))
                .unwrap();
        }
        let two = store.extensions()[1].id.clone();

        store.move_extension(&two, MoveDirection::Up).unwrap();
        assert_eq!(store.extensions()[0].id, two);
        // Already first: no-op
        store.move_extension(&two, MoveDirection::Up).unwrap();
        assert_eq!(store.extensions()[0].id, two);

        let reloaded = load_extensions(store.path()).unwrap();
        assert_eq!(reloaded[0].name, "two");
    }

    #[test]
    fn test_save_load_round_trip_is_stable() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        store
            .import_from_file(&valid_descriptor(temp.path(), "a"))
            .unwrap();
        store
            .import_from_file(&valid_descriptor(temp.path(), "b"))
            .unwrap();
        let original = fs::read_to_string(store.path()).unwrap();

        let loaded = load_extensions(store.path()).unwrap();
        save_extensions(store.path(), &loaded).unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), original);
    }

    #[test]
    fn test_legacy_document_gets_ids_once_saved() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(STORE_FILE_NAME);
        fs::write(
            &path,
            r#"[{"name": "old", "script": "/tmp/old.js", "enabled": true}]"#,
        )
        .unwrap();

        let mut store = ExtensionStore::open(path.clone()).unwrap();
        let id = store.extensions()[0].id.clone();
        store.save().unwrap();

        store.reload().unwrap();
        assert_eq!(store.extensions()[0].id, id);
        assert_eq!(store.extensions()[0].name, "old");
    }

    #[test]
    fn test_reload_picks_up_external_edits() {
        let temp = TempDir::new().unwrap();
        let mut store = store_in(&temp);
        store
            .import_from_file(&valid_descriptor(temp.path(), "a"))
            .unwrap();

        save_extensions(store.path(), &[]).unwrap();
        assert_eq!(store.len(), 1);
        store.reload().unwrap();
        assert!(store.is_empty());
    }
}
