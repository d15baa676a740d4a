//! Persisted token storage.
//!
//! Tokens live behind the small [`TokenStore`] capability so embedders can
//! swap in platform-specific secure storage. The default file store keeps
//! them in `<base>/tokens.json` with restricted permissions (0600).
//! Tokens are never logged or displayed in full.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// Which credential of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Persisted key name.
    pub fn key(self) -> &'static str {
        match self {
            TokenKind::Access => "access_token",
            TokenKind::Refresh => "refresh_token",
        }
    }
}

/// Minimal token persistence capability.
pub trait TokenStore: Send + Sync {
    fn get(&self, kind: TokenKind) -> Result<Option<String>>;

    fn set(&self, kind: TokenKind, value: &str) -> Result<()>;

    /// Removes every persisted token.
    fn clear(&self) -> Result<()>;

    fn set_pair(&self, access: &str, refresh: &str) -> Result<()> {
        self.set(TokenKind::Access, access)?;
        self.set(TokenKind::Refresh, refresh)
    }

    fn has_any(&self) -> Result<bool> {
        Ok(self.get(TokenKind::Access)?.is_some() || self.get(TokenKind::Refresh)?.is_some())
    }
}

/// On-disk token file layout: key name -> token.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct TokenFile {
    #[serde(flatten)]
    tokens: BTreeMap<String, String>,
}

/// JSON file backed store.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store at the default location under `TASKFLOW_HOME`.
    pub fn open_default() -> Self {
        Self::new(paths::tokens_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<TokenFile> {
        if !self.path.exists() {
            return Ok(TokenFile::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read tokens from {}", self.path.display()))?;
        if contents.trim().is_empty() {
            return Ok(TokenFile::default());
        }

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse tokens from {}", self.path.display()))
    }

    fn save(&self, file: &TokenFile) -> Result<()> {
        let path = &self.path;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(file).context("Failed to serialize tokens")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut handle = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            handle
                .write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.tokens.get(kind.key()).cloned())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut file = self.load()?;
        file.tokens.insert(kind.key().to_string(), value.to_string());
        self.save(&file)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.path.exists() {
            return Ok(());
        }
        let mut file = self.load().unwrap_or_default();
        file.tokens.remove(TokenKind::Access.key());
        file.tokens.remove(TokenKind::Refresh.key());
        self.save(&file)
    }
}

/// In-process store for tests and embedders without persistence.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<HashMap<TokenKind, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        let store = Self::default();
        {
            let mut tokens = store.tokens.lock().unwrap_or_else(PoisonError::into_inner);
            tokens.insert(TokenKind::Access, access.to_string());
            tokens.insert(TokenKind::Refresh, refresh.to_string());
        }
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: TokenKind) -> Result<Option<String>> {
        let tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(tokens.get(&kind).cloned())
    }

    fn set(&self, kind: TokenKind, value: &str) -> Result<()> {
        let mut tokens = self.tokens.lock().unwrap_or_else(PoisonError::into_inner);
        tokens.insert(kind, value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        Ok(())
    }
}

/// Returns a masked version of a token for display (first 12 chars + ...).
pub fn mask_token(token: &str) -> String {
    if token.chars().count() <= 16 {
        return "***".to_string();
    }
    let prefix: String = token.chars().take(12).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));
        assert_eq!(store.get(TokenKind::Access).unwrap(), None);
        assert!(!store.has_any().unwrap());
        store.clear().unwrap();
    }

    #[test]
    fn test_file_store_persists_under_browser_key_names() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tokens.json");
        let store = FileTokenStore::new(&path);
        store.set_pair("acc", "ref").unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("\"access_token\": \"acc\""));
        assert!(contents.contains("\"refresh_token\": \"ref\""));

        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.get(TokenKind::Refresh).unwrap().as_deref(), Some("ref"));
    }

    #[test]
    fn test_file_store_clear_removes_both() {
        let dir = tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("tokens.json"));
        store.set_pair("acc", "ref").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get(TokenKind::Access).unwrap(), None);
        assert_eq!(store.get(TokenKind::Refresh).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        FileTokenStore::new(&path).set(TokenKind::Access, "acc").unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::with_tokens("a", "r");
        assert_eq!(store.get(TokenKind::Access).unwrap().as_deref(), Some("a"));
        store.clear().unwrap();
        assert!(!store.has_any().unwrap());
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJhbGciOiJI...");
        assert_eq!(mask_token("short"), "***");
    }
}
