use crate::error::Result;
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Durable key-less storage for the serialized bookmark list
pub trait BookmarkStore: Send {
    /// Raw stored content, `None` when nothing has been saved yet
    fn load(&self) -> Result<Option<String>>;

    fn save(&mut self, content: &str) -> Result<()>;
}

/// Stores bookmarks as a JSON file on disk
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BookmarkStore for FileStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No bookmark file at {}", self.path.display());
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, content: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// In-memory store. Clones share the same slot, so a test can keep a handle
/// and inspect what the model persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(content.into()))),
        }
    }

    pub fn content(&self) -> Option<String> {
        self.slot.lock().map(|slot| slot.clone()).unwrap_or(None)
    }
}

impl BookmarkStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.content())
    }

    fn save(&mut self, content: &str) -> Result<()> {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(content.to_string());
        }
        Ok(())
    }
}
