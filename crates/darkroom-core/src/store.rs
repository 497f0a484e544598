//! Object storage collaborators.
//!
//! The engine only ever talks to storage through the [`ObjectStore`] trait.
//! Two backends ship with the crate:
//! - [`FsStore`]: objects as files under `<root>/<bucket>/<key>`, used by the
//!   CLI. Built once per process and shared across batches.
//! - [`MemoryStore`]: a hash map, used by tests and dry runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;

/// Byte-stream object storage, addressed by bucket and key.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's raw bytes.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Write an object, replacing any existing one at the same coordinates.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;
}

/// Filesystem-backed store mapping `bucket/key` under a root directory.
///
/// Content types are accepted but not persisted — the filesystem has no
/// native place for them and the CLI's consumers go by extension.
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the file path for a bucket/key pair.
    ///
    /// Keys come straight out of notification payloads, so every segment is
    /// validated before it touches the filesystem: `..`, `.`, and empty
    /// segments (leading/trailing/doubled separators) would escape or alias
    /// paths under the root and are rejected.
    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        let invalid = |message: &str| StoreError::Backend {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        };

        if bucket.is_empty() || bucket.contains('/') || bucket == "." || bucket == ".." {
            return Err(invalid("invalid bucket name"));
        }

        let mut path = self.root.join(bucket);
        for segment in key.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(invalid("key segment escapes the store root"));
            }
            path.push(segment);
        }
        Ok(path)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(bucket, key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(StoreError::Backend {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        let path = self.object_path(bucket, key)?;
        let backend_err = |e: std::io::Error| StoreError::Backend {
            bucket: bucket.to_string(),
            key: key.to_string(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(backend_err)?;
        }
        tokio::fs::write(&path, body).await.map_err(backend_err)
    }
}

/// One object held by a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub content_type: String,
}

/// In-memory store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object, bypassing the trait (no content type bookkeeping).
    pub fn insert(&self, bucket: &str, key: &str, body: Vec<u8>) {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: "application/octet-stream".to_string(),
            },
        );
    }

    /// Look up a stored object and its content type.
    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.objects
            .lock()
            .unwrap()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.lock().unwrap().is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StoreError> {
        self.object(bucket, key)
            .map(|o| o.body)
            .ok_or_else(|| StoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        self.objects.lock().unwrap().insert(
            (bucket.to_string(), key.to_string()),
            StoredObject {
                body,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }
}
