// Filesystem-backed object store for scrums.
//
// Objects live under `<root>/<account>/<object path>`. Every call is
// bounded by the store timeout.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use scrum_common::path::{validate_component, PathError};
use scrum_common::types::ObjectEntry;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info};

pub const DEFAULT_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("object `{0}` not found")]
    NotFound(String),

    #[error("object `{0}` already exists")]
    AlreadyExists(String),

    #[error("timed out after {after:?} during {op} of `{path}`")]
    Timeout { op: &'static str, path: String, after: Duration },

    #[error("invalid account name")]
    InvalidAccount(#[source] PathError),

    #[error("storage I/O error on `{path}`")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// An object body together with its metadata.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub entry: ObjectEntry,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct FsStore {
    base: PathBuf,
    timeout: Duration,
}

impl FsStore {
    pub fn new(root: &Path, account: &str) -> Result<Self, StoreError> {
        validate_component(account).map_err(StoreError::InvalidAccount)?;
        Ok(Self { base: root.join(account), timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS) })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn resolve(&self, object: &str) -> PathBuf {
        object.split('/').filter(|part| !part.is_empty()).fold(self.base.clone(), |path, part| {
            path.join(part)
        })
    }

    async fn bounded<T, F>(&self, op: &'static str, object: &str, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        timeout(self.timeout, fut).await.map_err(|_| StoreError::Timeout {
            op,
            path: object.to_string(),
            after: self.timeout,
        })?
    }

    /// Fetch an object's body and metadata.
    pub async fn get(&self, object: &str) -> Result<StoredObject, StoreError> {
        let path = self.resolve(object);
        self.bounded("get", object, async {
            let body = tokio::fs::read(&path).await.map_err(|err| map_io(object, err))?;
            let metadata = tokio::fs::metadata(&path).await.map_err(|err| map_io(object, err))?;
            debug!(object, bytes = body.len(), "fetched object");
            Ok(StoredObject { entry: entry_for(object, &metadata), body })
        })
        .await
    }

    pub async fn exists(&self, object: &str) -> Result<bool, StoreError> {
        let path = self.resolve(object);
        self.bounded("stat", object, async {
            match tokio::fs::metadata(&path).await {
                Ok(metadata) => Ok(metadata.is_file()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(err) => Err(map_io(object, err)),
            }
        })
        .await
    }

    /// Write an object, creating parent directories. Without `overwrite`
    /// an existing object is an error.
    pub async fn put(&self, object: &str, body: &[u8], overwrite: bool) -> Result<(), StoreError> {
        let path = self.resolve(object);
        self.bounded("put", object, async {
            if !overwrite && tokio::fs::try_exists(&path).await.map_err(|err| map_io(object, err))? {
                return Err(StoreError::AlreadyExists(object.to_string()));
            }

            let parent = path.parent().unwrap_or(&self.base);
            tokio::fs::create_dir_all(parent).await.map_err(|err| map_io(object, err))?;

            let tmp_path = temp_path_for(&path);
            tokio::fs::write(&tmp_path, body).await.map_err(|err| map_io(object, err))?;
            tokio::fs::rename(&tmp_path, &path).await.map_err(|err| map_io(object, err))?;

            info!(object, bytes = body.len(), overwrite, "stored object");
            Ok(())
        })
        .await
    }

    /// Files directly inside `dir`, sorted by name. A missing directory is
    /// empty.
    pub async fn list(&self, dir: &str) -> Result<Vec<ObjectEntry>, StoreError> {
        let path = self.resolve(dir);
        self.bounded("list", dir, async {
            let mut entries = Vec::new();
            let mut reader = match tokio::fs::read_dir(&path).await {
                Ok(reader) => reader,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(entries),
                Err(err) => return Err(map_io(dir, err)),
            };

            while let Some(dir_entry) = reader.next_entry().await.map_err(|err| map_io(dir, err))? {
                let name = dir_entry.file_name().to_string_lossy().into_owned();
                if name.starts_with('.') {
                    continue;
                }
                let metadata = dir_entry.metadata().await.map_err(|err| map_io(dir, err))?;
                if !metadata.is_file() {
                    continue;
                }
                entries.push(entry_for(&name, &metadata));
            }

            entries.sort_by(|a, b| a.name.cmp(&b.name));
            debug!(dir, count = entries.len(), "listed directory");
            Ok(entries)
        })
        .await
    }
}

fn entry_for(object: &str, metadata: &std::fs::Metadata) -> ObjectEntry {
    let name = object.rsplit('/').next().unwrap_or(object).to_string();
    let mtime = metadata.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now());
    ObjectEntry { name, size: metadata.len(), mtime }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

fn map_io(object: &str, err: io::Error) -> StoreError {
    match err.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(object.to_string()),
        _ => StoreError::Io { path: object.to_string(), source: err },
    }
}
