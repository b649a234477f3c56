use super::BlobStore;
use crate::error::{JournalError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem-backed blob store rooted at a single folder.
///
/// The root may be a local data directory or a mounted remote share; either
/// way, namespaces map to subdirectories and blobs to files.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_path(&self, namespace: &str) -> PathBuf {
        if namespace.is_empty() {
            self.root.clone()
        } else {
            self.root.join(namespace)
        }
    }

    fn blob_path(&self, namespace: &str, name: &str) -> PathBuf {
        self.namespace_path(namespace).join(name)
    }
}

impl BlobStore for FsBlobStore {
    fn ensure_namespace(&self, namespace: &str) -> Result<()> {
        let path = self.namespace_path(namespace);
        if !path.exists() {
            fs::create_dir_all(path).map_err(JournalError::Io)?;
        }
        Ok(())
    }

    fn exists(&self, namespace: &str, name: &str) -> Result<bool> {
        Ok(self.blob_path(namespace, name).is_file())
    }

    fn list(&self, namespace: &str) -> Result<Vec<String>> {
        let path = self.namespace_path(namespace);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let entries = fs::read_dir(&path).map_err(JournalError::Io)?;
        for entry in entries {
            let entry = entry.map_err(JournalError::Io)?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                // Dotfiles cover in-flight .tmp artifacts as well.
                if !name.starts_with('.') {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, namespace: &str, name: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(namespace, name);
        if !path.is_file() {
            return Err(JournalError::not_found(namespace, name));
        }
        fs::read(path).map_err(JournalError::Io)
    }

    fn write(&self, namespace: &str, name: &str, bytes: &[u8]) -> Result<()> {
        let dir = self.namespace_path(namespace);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(JournalError::Io)?;
        }

        // Atomic write: tmp then rename, so readers never see partial blobs.
        let tmp_path = dir.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_path, bytes).map_err(JournalError::Io)?;
        fs::rename(&tmp_path, self.blob_path(namespace, name)).map_err(JournalError::Io)?;

        Ok(())
    }

    fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        match fs::remove_file(self.blob_path(namespace, name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(JournalError::Io(err)),
        }
    }
}
