use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use curator_core::Connection;
use curator_session::{ConnectionStore, Result, SessionError};
use uuid::Uuid;

use super::WorkspaceError;
use super::atomic::write_json_atomic;

/// Connection store keeping one `<id>.json` file per connection.
#[derive(Debug, Clone)]
pub struct FileConnectionStore {
    root: PathBuf,
}

impl FileConnectionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn connection_path(&self, id: Uuid) -> PathBuf {
        self.root.join(format!("{id}.json"))
    }

    fn read(&self, path: &Path) -> std::result::Result<Connection, WorkspaceError> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn transport(err: impl std::fmt::Display) -> SessionError {
    SessionError::Transport(err.to_string())
}

#[async_trait]
impl ConnectionStore for FileConnectionStore {
    async fn get(&self, id: Uuid) -> Result<Connection> {
        let path = self.connection_path(id);
        match self.read(&path) {
            Ok(connection) => Ok(connection),
            Err(WorkspaceError::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                Err(SessionError::NotFound(id))
            }
            Err(err) => Err(transport(format!("{}: {err}", path.display()))),
        }
    }

    async fn save(&self, id: Uuid, connection: Connection) -> Result<Connection> {
        if connection.id != id {
            return Err(SessionError::Validation(format!(
                "connection id {} does not match target {id}",
                connection.id
            )));
        }
        write_json_atomic(&self.connection_path(id), &connection).map_err(transport)?;
        tracing::debug!(event = "connection_saved", connection_id = %id);
        Ok(connection)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        match std::fs::remove_file(self.connection_path(id)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Err(SessionError::NotFound(id)),
            Err(err) => Err(transport(err)),
        }
    }

    async fn list(&self) -> Result<Vec<Connection>> {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(transport(err)),
        };

        let mut connections = Vec::new();
        for entry in entries {
            let path = entry.map_err(transport)?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            match self.read(&path) {
                Ok(connection) => connections.push(connection),
                Err(err) => {
                    tracing::warn!(event = "connection_file_skipped", path = %path.display(), error = %err);
                }
            }
        }

        connections.sort_by(|left, right| left.name.cmp(&right.name).then(left.id.cmp(&right.id)));
        Ok(connections)
    }
}
