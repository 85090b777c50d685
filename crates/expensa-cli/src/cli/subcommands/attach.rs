use clap::{ArgAction, Subcommand};

/// Attachment commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AttachCommands {
    /// Upload a file. Re-uploading an active file name replaces it.
    Upload {
        /// Local file to upload.
        path: String,
        #[arg(long = "owner-type")]
        owner_type: String,
        #[arg(long = "owner-id")]
        owner_id: String,
        /// `submitter` or `admin`.
        #[arg(long, default_value = "submitter")]
        origin: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        description: Option<String>,
        /// Hide the file from the submitter (admin only).
        #[arg(long)]
        hidden: bool,
        #[arg(long = "line-item")]
        line_item: Option<String>,
        /// Override the guessed content type.
        #[arg(long = "content-type")]
        content_type: Option<String>,
    },
    /// List attachments of an owner.
    List {
        owner_type: String,
        owner_id: String,
        #[arg(long)]
        origin: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Include files hidden from the submitter.
        #[arg(long)]
        all: bool,
        /// Include soft-deleted files.
        #[arg(long = "include-deleted")]
        include_deleted: bool,
    },
    /// Get an attachment by ID, deleted or not.
    Get { id: String },
    /// Replace the file content, bumping the version.
    Replace { id: String, path: String },
    /// Edit category, description, or line-item link.
    Edit {
        id: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long = "clear-description")]
        clear_description: bool,
        #[arg(long = "line-item", conflicts_with = "clear_line_item")]
        line_item: Option<String>,
        #[arg(long = "clear-line-item")]
        clear_line_item: bool,
    },
    /// Soft-delete an attachment.
    Delete { id: String },
    /// Show or hide an attachment from the submitter (admin only).
    Visibility {
        id: String,
        #[arg(action = ArgAction::Set)]
        visible: bool,
    },
    /// Record a download and print the retrievable URL.
    Download { id: String },
}
