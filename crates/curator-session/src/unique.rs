use curator_core::validate_dsn;
use uuid::Uuid;

use crate::error::{Result, SessionError};
use crate::provider::ConnectionStore;

/// Reject `dsn` when another stored connection already uses it.
///
/// Both sides are compared in their normalized form, so `postgres://` and
/// `postgresql://` spellings of one database collide. `except` skips the
/// connection being updated.
pub async fn ensure_dsn_available(
    store: &dyn ConnectionStore,
    dsn: &str,
    except: Option<Uuid>,
) -> Result<()> {
    let wanted = normalize(dsn);
    let existing = store
        .list()
        .await?
        .into_iter()
        .filter(|connection| Some(connection.id) != except)
        .find(|connection| normalize(&connection.dsn) == wanted);

    match existing {
        Some(connection) => {
            tracing::info!(event = "dsn_taken", connection_id = %connection.id);
            Err(SessionError::AlreadyExists(connection.id))
        }
        None => Ok(()),
    }
}

fn normalize(dsn: &str) -> String {
    validate_dsn(dsn).unwrap_or_else(|_| dsn.to_string())
}

#[cfg(test)]
mod tests {
    use curator_core::Connection;

    use super::*;
    use crate::store::MemoryConnectionStore;

    #[tokio::test]
    async fn same_database_in_another_spelling_is_taken() {
        let existing = Connection::new("shop", "postgresql://reader:pw@localhost:5432/shop");
        let id = existing.id;
        let store = MemoryConnectionStore::with_connections([existing]);

        let err = ensure_dsn_available(&store, "postgres+asyncpg://reader:pw@localhost:5432/shop", None)
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::AlreadyExists(taken) if taken == id));

        ensure_dsn_available(&store, "postgresql://reader:pw@localhost:5432/billing", None)
            .await
            .expect("other database is free");
        ensure_dsn_available(&store, "postgresql://reader:pw@localhost:5432/shop", Some(id))
            .await
            .expect("own dsn is free when updating");
    }
}
