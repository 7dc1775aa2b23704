//! Durable preference storage: language, theme, font size, and one saved
//! code blob per language.
//!
//! The store must never raise to its caller. Storage may be missing or
//! read-only (ephemeral containers, restrictive sandboxes), so a failed read
//! is treated as an absent key and a failed write as a no-op, logged at
//! `warn` either way.

use std::{collections::HashMap, fs, path::PathBuf, sync::Mutex};

pub const KEY_LANGUAGE: &str = "editor-language";
pub const KEY_THEME: &str = "editor-theme";
pub const KEY_FONT_SIZE: &str = "editor-font-size";

/// Key under which the last-edited source for `language` is saved.
pub fn code_key(language: &str) -> String {
    format!("editor-code-{}", language)
}

pub trait PrefStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// One file per key under a prefs directory.
#[derive(Debug, Clone)]
pub struct FilePrefs {
    dir: PathBuf,
}

impl FilePrefs {
    pub fn new(dir: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(dir = %dir.display(), error = %e, "Could not create prefs directory");
        }
        Self { dir }
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl PrefStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.file_path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(e) = fs::write(self.file_path(key), value) {
            tracing::warn!(key, error = %e, "Could not save preference");
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.inner.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }
}

impl<T: PrefStore + ?Sized> PrefStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }
}

/// Store for environments with no persistence at all: reads find nothing,
/// writes go nowhere.
#[derive(Debug, Default)]
pub struct NoopPrefs;

impl PrefStore for NoopPrefs {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _value: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_prefs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePrefs::new(dir.path().join("prefs"));
        assert_eq!(prefs.get(KEY_THEME), None);
        prefs.set(KEY_THEME, "monokai");
        assert_eq!(prefs.get(KEY_THEME).as_deref(), Some("monokai"));
    }

    #[test]
    fn file_prefs_write_failure_is_silent() {
        // Point at a path that cannot be a directory.
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();
        let prefs = FilePrefs::new(blocker.clone());
        prefs.set("k", "v");
        assert_eq!(prefs.get("k"), None);
    }

    #[test]
    fn code_key_embeds_language() {
        assert_eq!(code_key("python"), "editor-code-python");
    }

    #[test]
    fn noop_prefs_read_after_write_is_absent() {
        let prefs = NoopPrefs;
        prefs.set(KEY_LANGUAGE, "go");
        assert_eq!(prefs.get(KEY_LANGUAGE), None);
    }
}
