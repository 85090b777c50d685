use clap::Subcommand;

use super::LifecycleKind;

/// Lifecycle record commands.
#[derive(Clone, Debug, Subcommand)]
pub enum RecordCommands {
    /// Create a record in `draft`.
    Create {
        kind: LifecycleKind,
        /// Field values as a JSON object.
        #[arg(long, conflicts_with = "file")]
        data: Option<String>,
        /// Read field values from a JSON file.
        #[arg(long)]
        file: Option<String>,
    },
    /// Get a record by ID.
    Get { kind: LifecycleKind, id: String },
    /// List records, newest first.
    List {
        kind: LifecycleKind,
        #[arg(long)]
        status: Option<String>,
        /// Only records created by this actor id.
        #[arg(long = "created-by")]
        created_by: Option<String>,
        /// Only records created by the session actor.
        #[arg(long, conflicts_with = "created_by")]
        mine: bool,
    },
    /// Edit free-form fields of a record.
    Update {
        kind: LifecycleKind,
        id: String,
        /// Changed fields as a JSON object.
        #[arg(long, conflicts_with = "file")]
        data: Option<String>,
        #[arg(long)]
        file: Option<String>,
    },
}
