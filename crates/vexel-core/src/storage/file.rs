//! JSON-file storage under a documents directory.

use super::{BoxFuture, DocumentMetadata, SceneStorage, StorageError, StorageResult};
use crate::scene::Scene;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// One `<id>.json` file per document inside `root`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Use `root` as the documents directory, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Platform data directory, e.g. `~/.local/share/vexel/documents`.
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| StorageError::Unavailable("no data directory".to_string()))?;
        Self::new(base.join("vexel").join("documents"))
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Ids become file names, so anything path-like is stripped.
    fn path_for(&self, id: &str) -> PathBuf {
        let mut sanitized: String = id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if sanitized.is_empty() {
            sanitized.push('_');
        }
        self.root.join(format!("{sanitized}.json"))
    }
}

impl SceneStorage for FileStorage {
    fn save(&self, scene: &Scene) -> BoxFuture<'_, StorageResult<()>> {
        let scene = scene.clone();
        Box::pin(async move {
            let json = scene.to_json()?;
            fs::write(self.path_for(&scene.id), json)?;
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Scene>> {
        let id = id.to_string();
        Box::pin(async move {
            let path = self.path_for(&id);
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    return Err(StorageError::NotFound(id));
                }
                Err(err) => return Err(err.into()),
            };
            Ok(Scene::from_json(&json)?)
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<DocumentMetadata>>> {
        Box::pin(async move {
            let mut entries = Vec::new();
            for entry in fs::read_dir(&self.root)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let parsed = fs::read_to_string(&path)
                    .map_err(StorageError::from)
                    .and_then(|json| Scene::from_json(&json).map_err(StorageError::from));
                match parsed {
                    Ok(scene) => entries.push(DocumentMetadata::of(&scene)),
                    Err(err) => {
                        log::warn!("skipping unreadable document {}: {err}", path.display());
                    }
                }
            }
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(entries)
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            match fs::remove_file(self.path_for(&id)) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    Err(StorageError::NotFound(id))
                }
                Err(err) => Err(err.into()),
            }
        })
    }
}
