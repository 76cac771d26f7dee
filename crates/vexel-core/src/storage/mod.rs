//! Document persistence behind an async-friendly trait.
//!
//! Backends return boxed futures so callers can await them from any
//! executor; the bundled backends do their work synchronously inside the
//! future.

mod autosave;
#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;

pub use autosave::AutoSave;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document not found: {0}")]
    NotFound(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Listing entry for a stored document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub id: String,
    pub name: String,
    pub element_count: usize,
}

impl DocumentMetadata {
    pub fn of(scene: &Scene) -> Self {
        Self {
            id: scene.id.clone(),
            name: scene.name.clone(),
            element_count: scene.len(),
        }
    }
}

/// A place documents can be saved to and loaded from.
pub trait SceneStorage: Send + Sync {
    fn save(&self, scene: &Scene) -> BoxFuture<'_, StorageResult<()>>;
    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Scene>>;
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<DocumentMetadata>>>;
    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>>;
}
