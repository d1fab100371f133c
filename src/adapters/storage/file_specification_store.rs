//! File-based Specification Store Adapter
//!
//! Sessions live as YAML under `<root>/sessions/<session-id>.yaml`;
//! finalized specifications as pretty-printed JSON under
//! `<root>/specifications/<project-id>.json`. Writes go to a temporary
//! file first and are renamed into place.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

use crate::domain::foundation::{ProjectId, SessionId};
use crate::domain::session::Session;
use crate::domain::specification::Specification;
use crate::ports::{SpecificationStore, StoreError};

/// File-based storage for sessions and specifications
#[derive(Debug)]
pub struct FileSpecificationStore {
    base_path: PathBuf,
    /// Serializes version checks with the writes that follow them.
    write_lock: Mutex<()>,
}

impl FileSpecificationStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSpecificationStore::new("./data");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    fn sessions_dir(&self) -> PathBuf {
        self.base_path.join("sessions")
    }

    fn specifications_dir(&self) -> PathBuf {
        self.base_path.join("specifications")
    }

    fn session_path(&self, id: &SessionId) -> PathBuf {
        self.sessions_dir().join(format!("{}.yaml", id))
    }

    /// Path of the JSON document for a finalized specification
    pub fn specification_path(&self, project_id: &ProjectId) -> PathBuf {
        self.specifications_dir()
            .join(format!("{}.json", project_id))
    }

    async fn read_session(&self, id: &SessionId) -> Result<Session, StoreError> {
        let yaml = match fs::read_to_string(self.session_path(id)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound(*id)),
            Err(e) => return Err(e.into()),
        };

        serde_yaml::from_str(&yaml).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    async fn write_session(&self, session: &Session, version: u64) -> Result<(), StoreError> {
        let mut stored = session.clone();
        stored.mark_persisted(version);

        let yaml =
            serde_yaml::to_string(&stored).map_err(|e| StoreError::Serialization(e.to_string()))?;
        write_atomically(&self.session_path(session.id()), yaml.as_bytes()).await
    }
}

/// Writes `contents` next to `path` and renames it into place.
async fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).await?;
    }

    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

#[async_trait]
impl SpecificationStore for FileSpecificationStore {
    async fn create(&self, session: &Session) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;

        if fs::try_exists(self.session_path(session.id())).await? {
            return Err(StoreError::AlreadyExists(*session.id()));
        }

        self.write_session(session, 1).await?;
        Ok(1)
    }

    async fn load(&self, id: &SessionId) -> Result<Session, StoreError> {
        self.read_session(id).await
    }

    async fn update(&self, session: &Session) -> Result<u64, StoreError> {
        let _guard = self.write_lock.lock().await;

        let current = self.read_session(session.id()).await?;
        if current.version() != session.version() {
            return Err(StoreError::VersionConflict {
                expected: session.version(),
                actual: current.version(),
            });
        }

        let version = session.version() + 1;
        self.write_session(session, version).await?;
        Ok(version)
    }

    async fn exists(&self, id: &SessionId) -> Result<bool, StoreError> {
        Ok(fs::try_exists(self.session_path(id)).await?)
    }

    async fn save_specification(
        &self,
        project_id: &ProjectId,
        specification: &Specification,
    ) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(specification)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let _guard = self.write_lock.lock().await;
        write_atomically(&self.specification_path(project_id), &json).await
    }

    async fn load_specification(
        &self,
        project_id: &ProjectId,
    ) -> Result<Specification, StoreError> {
        let json = match fs::read(self.specification_path(project_id)).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::SpecificationNotFound(project_id.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&json).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
