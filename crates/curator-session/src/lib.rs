//! Edit sessions and enrichment orchestration for Curator.
//!
//! An [`EditSession`] owns one connection while it is being curated; an
//! [`EnrichmentCoordinator`] issues per-column provider calls and feeds the
//! results back into the session on the owning task.

pub mod delete;
pub mod enrich;
pub mod error;
pub mod provider;
pub mod session;
pub mod store;
pub mod unique;

pub use delete::delete_connection;
pub use enrich::{EnrichmentCoordinator, EnrichmentEvent, EnrichmentKind, EnrichmentOutcome};
pub use error::{EnrichmentError, ProviderError, Result, SessionError};
pub use provider::{ConnectionStore, DeletionGate, PossibleValuesProvider, RelationshipProvider};
pub use session::EditSession;
pub use store::MemoryConnectionStore;
pub use unique::ensure_dsn_available;
