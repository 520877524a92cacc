use std::sync::Arc;

use chrono::{DateTime, Utc};
use curator_core::{Connection, Mutation, SchemaSet, redact_connection_string, validate_schema_set};
use uuid::Uuid;

use crate::error::{Result, SessionError};
use crate::provider::ConnectionStore;

/// Owns one connection while it is being curated.
///
/// Edits are applied through pure [`Mutation`]s; the previous tree is simply
/// replaced. The session remembers the last persisted value so unsaved edits
/// can be thrown away without a round trip.
pub struct EditSession {
    store: Arc<dyn ConnectionStore>,
    connection: Connection,
    persisted: Connection,
    dirty: bool,
    persisted_at: Option<DateTime<Utc>>,
}

impl EditSession {
    /// Start a session over an already loaded connection.
    pub fn new(store: Arc<dyn ConnectionStore>, connection: Connection) -> Self {
        Self {
            store,
            persisted: connection.clone(),
            connection,
            dirty: false,
            persisted_at: None,
        }
    }

    /// Load a connection from the store and start a session over it.
    pub async fn open(store: Arc<dyn ConnectionStore>, id: Uuid) -> Result<Self> {
        let connection = store.get(id).await?;
        tracing::info!(
            event = "session_opened",
            connection_id = %id,
            dsn = %redact_connection_string(&connection.dsn),
        );
        Ok(Self::new(store, connection))
    }

    pub fn connection_id(&self) -> Uuid {
        self.connection.id
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    pub fn tree(&self) -> &SchemaSet {
        &self.connection.options
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Time of the last successful commit in this session.
    pub fn persisted_at(&self) -> Option<DateTime<Utc>> {
        self.persisted_at
    }

    /// Replace the held connection wholesale and treat it as persisted.
    pub fn load(&mut self, connection: Connection) {
        self.persisted = connection.clone();
        self.connection = connection;
        self.dirty = false;
    }

    /// Apply one edit. Returns whether the tree changed.
    ///
    /// Edits that resolve to nothing (stale paths, identical values) leave the
    /// dirty flag as it was.
    pub fn apply(&mut self, mutation: &Mutation) -> bool {
        let next = mutation.apply(&self.connection.options);
        if next == self.connection.options {
            tracing::debug!(event = "mutation_noop", kind = mutation.kind());
            return false;
        }

        self.connection.options = next;
        self.dirty = true;
        tracing::debug!(event = "mutation_applied", kind = mutation.kind());
        true
    }

    /// Swap in a whole new tree, e.g. after a catalog refresh.
    ///
    /// Any index paths captured against the previous tree are invalid afterwards.
    pub fn replace_tree(&mut self, tree: SchemaSet) -> bool {
        if tree == self.connection.options {
            return false;
        }
        self.connection.options = tree;
        self.dirty = true;
        true
    }

    pub fn rename(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name == self.connection.name {
            return false;
        }
        self.connection.name = name;
        self.dirty = true;
        true
    }

    /// Drop unsaved edits and return to the last persisted value.
    pub fn discard(&mut self) {
        self.connection = self.persisted.clone();
        self.dirty = false;
        tracing::debug!(event = "session_discarded", connection_id = %self.connection.id);
    }

    /// Re-fetch the connection from the store, dropping unsaved edits.
    pub async fn reload(&mut self) -> Result<()> {
        let connection = self.store.get(self.connection.id).await?;
        self.load(connection);
        Ok(())
    }

    /// Validate and persist the held connection.
    ///
    /// On failure the tree and dirty flag are left as they were so the caller
    /// can retry or keep editing.
    pub async fn commit(&mut self) -> Result<Connection> {
        let id = self.connection.id;
        validate_schema_set(&self.connection.options)
            .map_err(|err| SessionError::Validation(err.to_string()))?;

        let saved = match self.store.save(id, self.connection.clone()).await {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!(event = "session_commit_failed", connection_id = %id, error = %err);
                return Err(err);
            }
        };

        self.persisted = saved.clone();
        self.connection = saved.clone();
        self.dirty = false;
        self.persisted_at = Some(Utc::now());
        tracing::info!(event = "session_committed", connection_id = %id);
        Ok(saved)
    }
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("connection_id", &self.connection.id)
            .field("dirty", &self.dirty)
            .field("persisted_at", &self.persisted_at)
            .finish_non_exhaustive()
    }
}
