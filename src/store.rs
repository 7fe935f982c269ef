//! Object storage that supplies source bytes and receives fitted canvases.
//!
//! Keys are opaque strings from callers; [`DirStore`] refuses any key that
//! would escape its root directory.

use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

/// Visibility of a stored object.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Acl {
    #[default]
    Private,
    PublicRead,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("invalid object key: {0:?}")]
    InvalidKey(String),

    #[error("storage I/O failed for {key}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// HTTP-style status for reporting this error to a caller.
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::NotFound(_) => 404,
            StoreError::InvalidKey(_) => 400,
            StoreError::Io { .. } => 500,
        }
    }
}

/// A flat key/value object store.
pub trait ObjectStore {
    /// Fetch the object stored under `key`.
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;

    /// Store `data` under `key`, returning a download locator for it.
    fn put(&self, key: &str, data: &[u8], acl: Acl) -> Result<String, StoreError>;
}

/// In-process store, mostly for tests and embedding.
#[derive(Debug)]
pub struct MemoryStore {
    base_url: String,
    objects: Mutex<HashMap<String, (Vec<u8>, Acl)>>,
}

impl MemoryStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// Insert an object directly, bypassing `put`.
    pub fn insert(&self, key: impl Into<String>, data: Vec<u8>) {
        self.lock().insert(key.into(), (data, Acl::Private));
    }

    /// Stored bytes and ACL for `key`, if present.
    pub fn object(&self, key: &str) -> Option<(Vec<u8>, Acl)> {
        self.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, (Vec<u8>, Acl)>> {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("memory://")
    }
}

impl ObjectStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        self.lock()
            .get(key)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| StoreError::NotFound(key.to_owned()))
    }

    fn put(&self, key: &str, data: &[u8], acl: Acl) -> Result<String, StoreError> {
        self.lock().insert(key.to_owned(), (data.to_vec(), acl));
        Ok(format!("{}{}", self.base_url, key))
    }
}

/// Store backed by a directory; keys are relative paths under it.
#[derive(Clone, Debug)]
pub struct DirStore {
    root: PathBuf,
    base_url: Option<String>,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            base_url: None,
        }
    }

    /// Report `<base_url>/<key>` as the download locator instead of the file path.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let rel = Path::new(key);
        let plain = !key.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(StoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(rel))
    }
}

impl ObjectStore for DirStore {
    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key)?;
        std::fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(key.to_owned()),
            _ => StoreError::Io {
                key: key.to_owned(),
                source,
            },
        })
    }

    fn put(&self, key: &str, data: &[u8], _acl: Acl) -> Result<String, StoreError> {
        let path = self.path_for(key)?;
        let io_err = |source| StoreError::Io {
            key: key.to_owned(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&path, data).map_err(io_err)?;
        Ok(match &self.base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => path.display().to_string(),
        })
    }
}
