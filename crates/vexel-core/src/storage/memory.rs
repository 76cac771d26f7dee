//! In-memory storage, for tests and ephemeral sessions.

use super::{BoxFuture, DocumentMetadata, SceneStorage, StorageError, StorageResult};
use crate::scene::Scene;
use std::collections::HashMap;
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, Scene>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.read().map(|docs| docs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SceneStorage for MemoryStorage {
    fn save(&self, scene: &Scene) -> BoxFuture<'_, StorageResult<()>> {
        let scene = scene.clone();
        Box::pin(async move {
            let mut documents = self
                .documents
                .write()
                .map_err(|_| StorageError::Unavailable("poisoned lock".to_string()))?;
            documents.insert(scene.id.clone(), scene);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Scene>> {
        let id = id.to_string();
        Box::pin(async move {
            let documents = self
                .documents
                .read()
                .map_err(|_| StorageError::Unavailable("poisoned lock".to_string()))?;
            documents
                .get(&id)
                .cloned()
                .ok_or(StorageError::NotFound(id))
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<DocumentMetadata>>> {
        Box::pin(async move {
            let documents = self
                .documents
                .read()
                .map_err(|_| StorageError::Unavailable("poisoned lock".to_string()))?;
            let mut entries: Vec<DocumentMetadata> =
                documents.values().map(DocumentMetadata::of).collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(entries)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut documents = self
                .documents
                .write()
                .map_err(|_| StorageError::Unavailable("poisoned lock".to_string()))?;
            match documents.remove(&id) {
                Some(_) => Ok(()),
                None => Err(StorageError::NotFound(id)),
            }
        })
    }
}
