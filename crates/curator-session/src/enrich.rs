//! Per-column enrichment orchestration.
//!
//! Provider calls run on spawned tasks and report back over a channel; only
//! the task that owns the coordinator and the [`EditSession`] touches the
//! pending maps or the tree. Requests for different columns, or for different
//! kinds on one column, never wait on each other. Two requests for the same
//! column and kind are not deduplicated: whichever resolves last wins.

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use curator_core::{ColumnField, ColumnKey, ColumnPath, FieldUpdate, Mutation, Relationship};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinError;
use uuid::Uuid;

use crate::error::{EnrichmentError, ProviderError};
use crate::provider::{PossibleValuesProvider, RelationshipProvider};
use crate::session::EditSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrichmentKind {
    PossibleValues,
    Relationships,
}

impl fmt::Display for EnrichmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PossibleValues => f.write_str("possible_values"),
            Self::Relationships => f.write_str("relationship"),
        }
    }
}

/// Completed provider call waiting to be folded into the session.
#[derive(Debug)]
pub struct EnrichmentEvent {
    epoch: u64,
    pub kind: EnrichmentKind,
    pub path: ColumnPath,
    pub result: Result<Value, ProviderError>,
}

/// What happened when an event was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// The column field was replaced.
    Applied,
    /// The payload was valid but the path no longer resolves, or the value
    /// was already there.
    Unchanged,
    /// The payload had an unexpected shape; existing data was kept.
    Malformed,
    /// The event belongs to a generation dropped by [`EnrichmentCoordinator::reset`].
    Stale,
}

/// Wire shape accepted for relationship payloads.
#[derive(Debug, Deserialize)]
struct RelationshipPayload {
    schema_name: String,
    table: String,
    column: String,
    #[serde(default)]
    enabled: bool,
}

pub struct EnrichmentCoordinator {
    values: Arc<dyn PossibleValuesProvider>,
    relationships: Arc<dyn RelationshipProvider>,
    pending_values: HashSet<ColumnKey>,
    pending_relationships: HashSet<ColumnKey>,
    epoch: u64,
    in_flight: usize,
    tx: UnboundedSender<EnrichmentEvent>,
    rx: UnboundedReceiver<EnrichmentEvent>,
}

impl EnrichmentCoordinator {
    pub fn new(
        values: Arc<dyn PossibleValuesProvider>,
        relationships: Arc<dyn RelationshipProvider>,
    ) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            values,
            relationships,
            pending_values: HashSet::new(),
            pending_relationships: HashSet::new(),
            epoch: 0,
            in_flight: 0,
            tx,
            rx,
        }
    }

    pub fn is_pending(&self, kind: EnrichmentKind, path: ColumnPath) -> bool {
        self.pending(kind).contains(&path.key())
    }

    /// Columns currently flagged as loading for `kind`.
    pub fn pending_paths(&self, kind: EnrichmentKind) -> Vec<ColumnPath> {
        let mut paths: Vec<ColumnPath> = self.pending(kind).iter().map(|key| key.path()).collect();
        paths.sort();
        paths
    }

    /// Number of provider calls whose results have not been received yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start sampling distinct values for the column at `path`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fetch_possible_values(
        &mut self,
        connection_id: Uuid,
        schema_name: &str,
        table_name: &str,
        column_name: &str,
        path: ColumnPath,
    ) {
        self.mark_pending(EnrichmentKind::PossibleValues, path);
        tracing::info!(
            event = "enrichment_started",
            kind = %EnrichmentKind::PossibleValues,
            path = %path,
            schema = schema_name,
            table = table_name,
            column = column_name,
        );

        let provider = Arc::clone(&self.values);
        let tx = self.tx.clone();
        let epoch = self.epoch;
        let (schema_name, table_name, column_name) = (
            schema_name.to_string(),
            table_name.to_string(),
            column_name.to_string(),
        );

        spawn_fetch(tx, epoch, EnrichmentKind::PossibleValues, path, async move {
            provider
                .fetch(connection_id, &schema_name, &table_name, &column_name)
                .await
        });
    }

    /// Start inferring relationships for the column at `path`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn fetch_relationships(
        &mut self,
        connection_id: Uuid,
        schema_name: &str,
        table_name: &str,
        column_name: &str,
        column_type: &str,
        path: ColumnPath,
    ) {
        self.mark_pending(EnrichmentKind::Relationships, path);
        tracing::info!(
            event = "enrichment_started",
            kind = %EnrichmentKind::Relationships,
            path = %path,
            schema = schema_name,
            table = table_name,
            column = column_name,
            column_type = column_type,
        );

        let provider = Arc::clone(&self.relationships);
        let tx = self.tx.clone();
        let epoch = self.epoch;
        let (schema_name, table_name, column_name, column_type) = (
            schema_name.to_string(),
            table_name.to_string(),
            column_name.to_string(),
            column_type.to_string(),
        );

        spawn_fetch(tx, epoch, EnrichmentKind::Relationships, path, async move {
            provider
                .fetch(
                    connection_id,
                    &schema_name,
                    &table_name,
                    &column_name,
                    &column_type,
                )
                .await
        });
    }

    /// Issue a fetch for a column of the session's current tree.
    ///
    /// Names and the column type are read from the tree. Returns `false` when
    /// `path` does not resolve.
    pub fn enrich_column(
        &mut self,
        session: &EditSession,
        kind: EnrichmentKind,
        path: ColumnPath,
    ) -> bool {
        let tree = session.tree();
        let (Some(schema), Some(table), Some(column)) = (
            tree.schema(path.schema_index),
            tree.table(path.table()),
            tree.column(path),
        ) else {
            return false;
        };

        let connection_id = session.connection_id();
        match kind {
            EnrichmentKind::PossibleValues => self.fetch_possible_values(
                connection_id,
                &schema.name,
                &table.name,
                &column.name,
                path,
            ),
            EnrichmentKind::Relationships => self.fetch_relationships(
                connection_id,
                &schema.name,
                &table.name,
                &column.name,
                &column.column_type,
                path,
            ),
        }
        true
    }

    /// Wait for the next provider result. Returns `None` once nothing is in flight.
    pub async fn next_event(&mut self) -> Option<EnrichmentEvent> {
        if self.in_flight == 0 {
            return None;
        }
        let event = self.rx.recv().await?;
        self.in_flight -= 1;
        Some(event)
    }

    /// Fold a provider result into the session.
    ///
    /// The pending flag for the event's path is cleared whatever the result.
    /// Provider failures are returned; malformed payloads and stale paths are
    /// absorbed.
    pub fn resolve(
        &mut self,
        event: EnrichmentEvent,
        session: &mut EditSession,
    ) -> Result<EnrichmentOutcome, EnrichmentError> {
        let EnrichmentEvent {
            epoch,
            kind,
            path,
            result,
        } = event;

        if epoch != self.epoch {
            tracing::debug!(event = "enrichment_stale", kind = %kind, path = %path);
            return Ok(EnrichmentOutcome::Stale);
        }

        self.pending_mut(kind).remove(&path.key());

        let payload = match result {
            Ok(payload) => payload,
            Err(source) => {
                tracing::warn!(event = "enrichment_failed", kind = %kind, path = %path, error = %source);
                return Err(EnrichmentError::Provider { kind, path, source });
            }
        };

        let Some(field) = decode_payload(kind, payload) else {
            tracing::warn!(event = "enrichment_malformed", kind = %kind, path = %path);
            return Ok(EnrichmentOutcome::Malformed);
        };

        let changed = session.apply(&Mutation::SetColumnField {
            path,
            update: FieldUpdate::Column(field),
        });
        tracing::info!(event = "enrichment_finished", kind = %kind, path = %path, changed);

        Ok(if changed {
            EnrichmentOutcome::Applied
        } else {
            EnrichmentOutcome::Unchanged
        })
    }

    /// Await and resolve every outstanding fetch, collecting provider failures.
    pub async fn settle(&mut self, session: &mut EditSession) -> Vec<EnrichmentError> {
        let mut failures = Vec::new();
        while let Some(event) = self.next_event().await {
            if let Err(err) = self.resolve(event, session) {
                failures.push(err);
            }
        }
        failures
    }

    /// Forget all pending state; results of calls already issued are dropped
    /// when they arrive.
    pub fn reset(&mut self) {
        self.pending_values.clear();
        self.pending_relationships.clear();
        self.epoch += 1;
    }

    fn mark_pending(&mut self, kind: EnrichmentKind, path: ColumnPath) {
        self.pending_mut(kind).insert(path.key());
        self.in_flight += 1;
    }

    fn pending(&self, kind: EnrichmentKind) -> &HashSet<ColumnKey> {
        match kind {
            EnrichmentKind::PossibleValues => &self.pending_values,
            EnrichmentKind::Relationships => &self.pending_relationships,
        }
    }

    fn pending_mut(&mut self, kind: EnrichmentKind) -> &mut HashSet<ColumnKey> {
        match kind {
            EnrichmentKind::PossibleValues => &mut self.pending_values,
            EnrichmentKind::Relationships => &mut self.pending_relationships,
        }
    }
}

impl fmt::Debug for EnrichmentCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnrichmentCoordinator")
            .field("pending_values", &self.pending_values)
            .field("pending_relationships", &self.pending_relationships)
            .field("epoch", &self.epoch)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

/// Run a provider call and report its result, including a panicked call.
///
/// The call runs on its own task so a panic surfaces as a [`JoinError`]
/// instead of taking the reporting task down with it.
fn spawn_fetch<F>(
    tx: UnboundedSender<EnrichmentEvent>,
    epoch: u64,
    kind: EnrichmentKind,
    path: ColumnPath,
    call: F,
) where
    F: Future<Output = Result<Value, ProviderError>> + Send + 'static,
{
    tokio::spawn(async move {
        let result = tokio::spawn(call).await.unwrap_or_else(|err| Err(task_failed(err)));
        tx.send(EnrichmentEvent {
            epoch,
            kind,
            path,
            result,
        })
        .ok();
    });
}

fn task_failed(err: JoinError) -> ProviderError {
    ProviderError::Transport(format!("provider task failed: {err}"))
}

fn decode_payload(kind: EnrichmentKind, payload: Value) -> Option<ColumnField> {
    match kind {
        EnrichmentKind::PossibleValues => serde_json::from_value::<Vec<String>>(payload)
            .ok()
            .map(ColumnField::PossibleValues),
        EnrichmentKind::Relationships => serde_json::from_value::<Vec<RelationshipPayload>>(payload)
            .ok()
            .map(|items| {
                ColumnField::Relationship(
                    items
                        .into_iter()
                        .map(|item| {
                            Relationship::new(item.schema_name, item.table, item.column, item.enabled)
                        })
                        .collect(),
                )
            }),
    }
}
