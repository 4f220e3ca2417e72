//! Security event storage backends.

use crate::error::AuditError;
use crate::event::SecurityEvent;
use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Trait for security event storage backends.
#[async_trait]
pub trait SecurityStorage: Send + Sync {
    /// Store a security event.
    async fn store(&self, event: SecurityEvent) -> Result<(), AuditError>;
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullStorage;

impl NullStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecurityStorage for NullStorage {
    async fn store(&self, _event: SecurityEvent) -> Result<(), AuditError> {
        Ok(())
    }
}

/// Prints human-readable lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleStorage;

impl ConsoleStorage {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SecurityStorage for ConsoleStorage {
    async fn store(&self, event: SecurityEvent) -> Result<(), AuditError> {
        println!("{}", event.to_log_line());
        Ok(())
    }
}

/// Appends JSON Lines to a file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Create a file storage, creating the parent directory if needed.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| {
                AuditError::InitializationFailed(format!(
                    "cannot create {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SecurityStorage for FileStorage {
    async fn store(&self, event: SecurityEvent) -> Result<(), AuditError> {
        let mut json = serde_json::to_string(&event)?;
        json.push('\n');

        // One write per line keeps concurrent appenders from interleaving.
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

/// File output plus console output.
#[derive(Debug)]
pub struct DualStorage {
    file: FileStorage,
    console: ConsoleStorage,
}

impl DualStorage {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, AuditError> {
        Ok(Self {
            file: FileStorage::new(path)?,
            console: ConsoleStorage::new(),
        })
    }
}

#[async_trait]
impl SecurityStorage for DualStorage {
    async fn store(&self, event: SecurityEvent) -> Result<(), AuditError> {
        self.console.store(event.clone()).await?;
        self.file.store(event).await
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    events: RwLock<Vec<SecurityEvent>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored events, oldest first.
    pub fn events(&self) -> Vec<SecurityEvent> {
        self.events
            .read()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SecurityStorage for MemoryStorage {
    async fn store(&self, event: SecurityEvent) -> Result<(), AuditError> {
        let mut events = self
            .events
            .write()
            .map_err(|e| AuditError::StorageError(format!("Failed to acquire write lock: {}", e)))?;
        events.push(event);
        Ok(())
    }
}
