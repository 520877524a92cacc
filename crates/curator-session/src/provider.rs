use async_trait::async_trait;
use curator_core::Connection;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{ProviderError, Result};

/// Loads and persists connection records.
#[async_trait]
pub trait ConnectionStore: Send + Sync {
    /// Fetch a connection, or [`crate::SessionError::NotFound`].
    async fn get(&self, id: Uuid) -> Result<Connection>;

    /// Persist a connection and return the stored value.
    async fn save(&self, id: Uuid, connection: Connection) -> Result<Connection>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn list(&self) -> Result<Vec<Connection>>;
}

/// Samples distinct values of one column.
///
/// The payload is opaque to the provider contract; the coordinator expects a
/// JSON array of strings and ignores anything else.
#[async_trait]
pub trait PossibleValuesProvider: Send + Sync {
    async fn fetch(
        &self,
        connection_id: Uuid,
        schema_name: &str,
        table_name: &str,
        column_name: &str,
    ) -> std::result::Result<Value, ProviderError>;
}

/// Infers candidate foreign-key targets for one column.
///
/// The payload is expected to be a JSON array of relationship objects.
#[async_trait]
pub trait RelationshipProvider: Send + Sync {
    async fn fetch(
        &self,
        connection_id: Uuid,
        schema_name: &str,
        table_name: &str,
        column_name: &str,
        column_type: &str,
    ) -> std::result::Result<Value, ProviderError>;
}

/// Caller-supplied confirmation consulted before a connection is deleted.
pub trait DeletionGate {
    /// `dependents` is computed by the caller (for example, conversations
    /// that reference the connection).
    fn confirm(&self, connection: &Connection, dependents: usize) -> bool;
}

impl<F> DeletionGate for F
where
    F: Fn(&Connection, usize) -> bool,
{
    fn confirm(&self, connection: &Connection, dependents: usize) -> bool {
        self(connection, dependents)
    }
}
