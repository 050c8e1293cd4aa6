//! Artifact storage: a narrow write/read seam over the report directory.
//!
//! The original output directory is global shared state; modelling it as an
//! injected [`ArtifactStore`] keeps the pipeline testable in memory and puts
//! the traversal check in exactly one place. The store is append-only by
//! construction — artifacts are written once under a timestamp-qualified
//! name and only ever read afterwards, so no locking is needed.

use crate::error::CasebriefError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::{debug, info};

/// Flat keyed byte store for report artifacts.
///
/// `read` of a name that was never written resolves to
/// [`CasebriefError::ArtifactNotFound`] — a miss, never a fault.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), CasebriefError>;
    async fn read(&self, name: &str) -> Result<Vec<u8>, CasebriefError>;
}

/// Reject names that could resolve outside a flat store directory.
///
/// Artifact names are generated by the pipeline and never contain path
/// structure; anything with separators or dot-dot segments is a lookup for
/// a file this store does not have.
fn is_flat_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

// ── Directory-backed store ───────────────────────────────────────────────

/// Artifact store over a single flat filesystem directory.
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// Open (and create if missing) the store directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, CasebriefError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| CasebriefError::Internal(format!(
                "cannot create report directory '{}': {e}",
                root.display()
            )))?;
        info!("report store at {}", root.display());
        Ok(Self { root })
    }
}

#[async_trait]
impl ArtifactStore for DirStore {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), CasebriefError> {
        if !is_flat_name(name) {
            return Err(CasebriefError::ArtifactWriteFailed {
                name: name.to_string(),
                detail: "artifact names must be flat filenames".into(),
            });
        }

        let path = self.root.join(name);
        let tmp = self.root.join(format!("{name}.tmp"));

        // Write to a temp name then rename, so a crash mid-write can never
        // leave a half-written artifact under a retrievable name.
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| CasebriefError::ArtifactWriteFailed {
                name: name.to_string(),
                detail: e.to_string(),
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| CasebriefError::ArtifactWriteFailed {
                name: name.to_string(),
                detail: e.to_string(),
            })?;

        debug!("wrote artifact {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, CasebriefError> {
        if !is_flat_name(name) {
            return Err(CasebriefError::ArtifactNotFound {
                name: name.to_string(),
            });
        }
        match tokio::fs::read(self.root.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(CasebriefError::ArtifactNotFound {
                    name: name.to_string(),
                })
            }
            Err(e) => Err(CasebriefError::Internal(format!(
                "cannot read artifact '{name}': {e}"
            ))),
        }
    }
}

// ── In-memory store ──────────────────────────────────────────────────────

/// In-memory artifact store for tests and embedded use.
#[derive(Default)]
pub struct MemoryStore {
    artifacts: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names currently held, unordered.
    pub fn names(&self) -> Vec<String> {
        self.artifacts
            .read()
            .expect("artifact map poisoned")
            .keys()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), CasebriefError> {
        if !is_flat_name(name) {
            return Err(CasebriefError::ArtifactWriteFailed {
                name: name.to_string(),
                detail: "artifact names must be flat filenames".into(),
            });
        }
        self.artifacts
            .write()
            .expect("artifact map poisoned")
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, CasebriefError> {
        self.artifacts
            .read()
            .expect("artifact map poisoned")
            .get(name)
            .cloned()
            .ok_or_else(|| CasebriefError::ArtifactNotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_round_trips() {
        let store = MemoryStore::new();
        store.write("report.txt", b"body").await.unwrap();
        assert_eq!(store.read("report.txt").await.unwrap(), b"body");
    }

    #[tokio::test]
    async fn missing_artifact_is_not_found() {
        let store = MemoryStore::new();
        let err = store.read("never_written.pdf").await.unwrap_err();
        assert!(matches!(err, CasebriefError::ArtifactNotFound { .. }));
    }

    #[tokio::test]
    async fn traversal_names_are_rejected() {
        let store = MemoryStore::new();
        for name in ["../etc/passwd", "a/b.txt", "..", ""] {
            assert!(store.write(name, b"x").await.is_err(), "write {name:?}");
        }
    }

    #[tokio::test]
    async fn dir_store_round_trips_and_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::open(dir.path()).await.unwrap();

        store.write("case_report_1.txt", b"hello").await.unwrap();
        assert_eq!(store.read("case_report_1.txt").await.unwrap(), b"hello");

        let err = store.read("../outside.txt").await.unwrap_err();
        assert!(matches!(err, CasebriefError::ArtifactNotFound { .. }));

        let err = store.read("no_such_file.pdf").await.unwrap_err();
        assert!(matches!(err, CasebriefError::ArtifactNotFound { .. }));
    }

    #[tokio::test]
    async fn dir_store_write_replaces_no_partial_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirStore::open(dir.path()).await.unwrap();
        store.write("r.txt", b"final").await.unwrap();
        // Temp name must not survive the rename.
        assert!(!dir.path().join("r.txt.tmp").exists());
    }
}
