use clap::ValueEnum;

pub mod attach;
pub mod record;
pub mod status;

pub use attach::AttachCommands;
pub use record::RecordCommands;
pub use status::StatusCommands;

/// Which lifecycle a record command targets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum LifecycleKind {
    #[value(alias = "funding_request", alias = "fr")]
    FundingRequest,
    #[value(alias = "expense_report", alias = "er")]
    ExpenseReport,
    #[value(alias = "reimbursement_claim", alias = "rc")]
    ReimbursementClaim,
}
