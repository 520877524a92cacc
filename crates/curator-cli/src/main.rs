mod commands;
mod logging;
mod workspace;

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use curator_core::Error as CoreError;
use curator_session::{EnrichmentError, SessionError};
use thiserror::Error;
use uuid::Uuid;

use crate::logging::{LoggingError, init_logging};
use crate::workspace::{CuratorSettings, WorkspaceError, load_or_create_settings};

#[derive(Debug, Error)]
enum CliError {
    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("session error: {0}")]
    Session(#[from] SessionError),
    #[error("enrichment error: {0}")]
    Enrichment(#[from] EnrichmentError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),
}

#[derive(Parser, Debug)]
#[command(name = "curator", version, about = "Curate which parts of a database are exposed")]
struct Cli {
    /// Settings file, created with defaults when missing.
    #[arg(long, global = true, default_value = "curator.toml")]
    config: PathBuf,
    /// Directory holding connection files.
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,
    /// JSON log file (defaults to stderr).
    #[arg(long, global = true)]
    log_path: Option<PathBuf>,
    /// Database used for discovery and enrichment instead of the stored DSN.
    #[arg(long, global = true, value_name = "CONNECTION_STRING")]
    database_url: Option<String>,
    /// Maximum distinct values sampled per column.
    #[arg(long, global = true)]
    sample_limit: Option<i64>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored connections.
    List,
    /// Print the exposure tree of a connection.
    Show(ShowArgs),
    /// Discover a database and store it as a new connection.
    Import(ImportArgs),
    /// Re-read the catalog and merge it into the curated tree.
    Refresh(RefreshArgs),
    /// Enable or disable a schema and all of its tables.
    Schema(SchemaArgs),
    /// Edit one table.
    Table(TableArgs),
    /// Set one field of a column or of one of its relationships.
    Column(ColumnArgs),
    /// Fill possible values or relationships of a column from the database.
    Enrich(EnrichArgs),
    /// Rename a connection.
    Rename(RenameArgs),
    /// Delete a connection.
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
struct ShowArgs {
    id: Uuid,
    /// Print the stored JSON instead of the tree.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct ImportArgs {
    #[arg(long)]
    name: String,
    #[arg(long, value_name = "CONNECTION_STRING")]
    dsn: String,
    /// Schema name(s) to include.
    #[arg(long, value_name = "SCHEMA")]
    schema: Vec<String>,
    /// Include system schemas such as pg_catalog.
    #[arg(long, default_value_t = false)]
    include_system_schemas: bool,
}

#[derive(Args, Debug)]
struct RefreshArgs {
    id: Uuid,
}

#[derive(Args, Debug)]
struct SchemaArgs {
    id: Uuid,
    schema_index: usize,
    #[arg(long, action = clap::ArgAction::Set)]
    enabled: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("edit").required(true).multiple(true).args(["enabled", "description"])))]
struct TableArgs {
    id: Uuid,
    schema_index: usize,
    table_index: usize,
    #[arg(long)]
    enabled: Option<bool>,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct ColumnArgs {
    id: Uuid,
    schema_index: usize,
    table_index: usize,
    column_index: usize,
    #[arg(long)]
    field: String,
    /// JSON value; bare text is taken as a string.
    #[arg(long)]
    value: String,
    /// Relationship index; omit or pass a negative number for the column itself.
    #[arg(long, allow_negative_numbers = true)]
    relation: Option<i64>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum EnrichKindArg {
    Values,
    Relationships,
}

#[derive(Args, Debug)]
struct EnrichArgs {
    id: Uuid,
    schema_index: usize,
    table_index: usize,
    column_index: usize,
    #[arg(long, value_enum)]
    kind: EnrichKindArg,
}

#[derive(Args, Debug)]
struct RenameArgs {
    id: Uuid,
    name: String,
}

#[derive(Args, Debug)]
struct DeleteArgs {
    id: Uuid,
    /// Number of records that reference this connection.
    #[arg(long, default_value_t = 0)]
    dependents: usize,
    /// Skip the confirmation prompt.
    #[arg(long, default_value_t = false)]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = resolve_settings(&cli)?;
    init_logging(settings.log_path.as_deref())?;

    tracing::debug!(
        event = "settings_loaded",
        config = %cli.config.display(),
        store_dir = %settings.store_dir.display()
    );

    let ctx = commands::Context::new(settings);
    match cli.command {
        Command::List => commands::list(&ctx).await,
        Command::Show(args) => commands::show(&ctx, args).await,
        Command::Import(args) => commands::import(&ctx, args).await,
        Command::Refresh(args) => commands::refresh(&ctx, args).await,
        Command::Schema(args) => commands::schema(&ctx, args).await,
        Command::Table(args) => commands::table(&ctx, args).await,
        Command::Column(args) => commands::column(&ctx, args).await,
        Command::Enrich(args) => commands::enrich(&ctx, args).await,
        Command::Rename(args) => commands::rename(&ctx, args).await,
        Command::Delete(args) => commands::delete(&ctx, args).await,
    }
}

/// Flags win over the settings file, which wins over defaults.
fn resolve_settings(cli: &Cli) -> Result<CuratorSettings, CliError> {
    let mut settings = load_or_create_settings(&cli.config)?;
    if let Some(store_dir) = &cli.store_dir {
        settings.store_dir = store_dir.clone();
    }
    if let Some(log_path) = &cli.log_path {
        settings.log_path = Some(log_path.clone());
    }
    if let Some(database_url) = &cli.database_url {
        settings.database_url = Some(database_url.clone());
    }
    if let Some(sample_limit) = cli.sample_limit {
        settings.sample_limit = sample_limit;
    }
    if settings.sample_limit <= 0 {
        return Err(CliError::InvalidConfig(
            "sample_limit must be positive".to_string(),
        ));
    }
    Ok(settings)
}
