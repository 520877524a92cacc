use uuid::Uuid;

use crate::error::Result;
use crate::provider::{ConnectionStore, DeletionGate};

/// Delete a connection once the caller's gate has confirmed it.
///
/// Returns `Ok(false)` when the gate declines. Dependent records are not
/// touched here; their count is only passed through to the gate.
pub async fn delete_connection(
    store: &dyn ConnectionStore,
    gate: &dyn DeletionGate,
    id: Uuid,
    dependents: usize,
) -> Result<bool> {
    let connection = store.get(id).await?;

    if !gate.confirm(&connection, dependents) {
        tracing::info!(event = "delete_declined", connection_id = %id, dependents);
        return Ok(false);
    }

    store.delete(id).await?;
    tracing::info!(event = "connection_deleted", connection_id = %id, dependents);
    Ok(true)
}
