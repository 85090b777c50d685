use clap::Subcommand;

use super::LifecycleKind;

/// Status transition commands.
#[derive(Clone, Debug, Subcommand)]
pub enum StatusCommands {
    /// Statuses the session actor may move a record to.
    Transitions { kind: LifecycleKind, id: String },
    /// Move a record to a new status.
    Change {
        kind: LifecycleKind,
        id: String,
        /// Target status (e.g. `pending`, `under_analysis`).
        to: String,
        #[arg(long)]
        note: Option<String>,
        /// Requester profile JSON, captured as a snapshot on submission.
        #[arg(long)]
        profile: Option<String>,
    },
}
