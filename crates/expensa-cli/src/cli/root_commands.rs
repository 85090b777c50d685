use clap::{Args, Subcommand};

use crate::cli::subcommands::{AttachCommands, RecordCommands, StatusCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Funding requests, expense reports, and reimbursement claims.
    Record {
        #[command(subcommand)]
        action: RecordCommands,
    },
    /// Status transitions.
    Status {
        #[command(subcommand)]
        action: StatusCommands,
    },
    /// Status history of one record, oldest first.
    History(HistoryArgs),
    /// Attachments.
    Attach {
        #[command(subcommand)]
        action: AttachCommands,
    },
    /// Query the audit log, newest first.
    Audit(AuditArgs),
    /// Print the JSON Schema of an entity.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct HistoryArgs {
    /// Entity type (e.g. `funding_request`).
    pub entity_type: String,
    pub entity_id: String,
}

#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[arg(long = "entity-type")]
    pub entity_type: Option<String>,
    #[arg(long = "entity-id")]
    pub entity_id: Option<String>,
    #[arg(long)]
    pub action: Option<String>,
    /// Only entries written by this actor id.
    #[arg(long)]
    pub actor: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Entity name (e.g. `funding_request`, `attachment`, `actor_profile`).
    pub type_name: String,
}
