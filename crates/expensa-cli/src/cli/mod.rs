use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `xp` binary.
#[derive(Debug, Parser)]
#[command(
    name = "xp",
    version,
    about = "Expensa - expense reimbursement workflow and provenance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::subcommands::{AttachCommands, LifecycleKind, RecordCommands, StatusCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "xp",
            "--format",
            "raw",
            "--limit",
            "10",
            "--verbose",
            "audit",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Audit(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["xp", "history", "funding_request", "fr-1", "--quiet"])
            .expect("cli should parse");

        assert!(cli.quiet);
        let flags = cli.global_flags();
        assert_eq!(flags.format, OutputFormat::Json);
        assert!(flags.quiet);
    }

    #[test]
    fn output_format_rejects_table() {
        let parsed = Cli::try_parse_from(["xp", "--format", "table", "audit"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn lifecycle_kind_accepts_aliases() {
        for value in ["funding-request", "funding_request", "fr"] {
            let cli = Cli::try_parse_from(["xp", "record", "get", value, "fr-1"])
                .expect("cli should parse");
            let Commands::Record {
                action: RecordCommands::Get { kind, id },
            } = cli.command
            else {
                panic!("expected record get");
            };
            assert_eq!(kind, LifecycleKind::FundingRequest);
            assert_eq!(id, "fr-1");
        }
    }

    #[test]
    fn status_change_takes_note_and_profile() {
        let cli = Cli::try_parse_from([
            "xp",
            "status",
            "change",
            "rc",
            "rc-1",
            "pending",
            "--note",
            "ready",
            "--profile",
            "me.json",
        ])
        .expect("cli should parse");
        let Commands::Status {
            action:
                StatusCommands::Change {
                    kind,
                    to,
                    note,
                    profile,
                    ..
                },
        } = cli.command
        else {
            panic!("expected status change");
        };
        assert_eq!(kind, LifecycleKind::ReimbursementClaim);
        assert_eq!(to, "pending");
        assert_eq!(note.as_deref(), Some("ready"));
        assert_eq!(profile.as_deref(), Some("me.json"));
    }

    #[test]
    fn visibility_takes_explicit_bool() {
        let cli = Cli::try_parse_from(["xp", "attach", "visibility", "att-1", "false"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Attach {
                action: AttachCommands::Visibility { visible: false, .. }
            }
        ));
    }

    #[test]
    fn record_create_rejects_data_and_file_together() {
        let parsed = Cli::try_parse_from([
            "xp", "record", "create", "er", "--data", "{}", "--file", "x.json",
        ]);
        assert!(parsed.is_err());
    }
}
