use std::collections::BTreeMap;

use async_trait::async_trait;
use curator_core::Connection;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{Result, SessionError};
use crate::provider::ConnectionStore;

/// In-process store keyed by connection id.
#[derive(Debug, Default)]
pub struct MemoryConnectionStore {
    connections: RwLock<BTreeMap<Uuid, Connection>>,
}

impl MemoryConnectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connections(connections: impl IntoIterator<Item = Connection>) -> Self {
        Self {
            connections: RwLock::new(
                connections
                    .into_iter()
                    .map(|connection| (connection.id, connection))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl ConnectionStore for MemoryConnectionStore {
    async fn get(&self, id: Uuid) -> Result<Connection> {
        self.connections
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    async fn save(&self, id: Uuid, mut connection: Connection) -> Result<Connection> {
        connection.id = id;
        self.connections.write().await.insert(id, connection.clone());
        Ok(connection)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.connections
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(SessionError::NotFound(id))
    }

    async fn list(&self) -> Result<Vec<Connection>> {
        Ok(self.connections.read().await.values().cloned().collect())
    }
}
