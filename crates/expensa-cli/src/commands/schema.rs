use anyhow::bail;
use expensa_core::entities::{
    Attachment, AuditEntry, ExpenseReport, FundingRequest, ReimbursementClaim, RequesterSnapshot,
    StatusHistoryEntry,
};
use expensa_core::identity::ActorProfile;
use schemars::{Schema, schema_for};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

const KNOWN: &[&str] = &[
    "funding_request",
    "expense_report",
    "reimbursement_claim",
    "attachment",
    "status_history",
    "audit_log",
    "requester_snapshot",
    "actor_profile",
];

/// Handle `xp schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema(&args.type_name)?, flags.format)
}

pub fn schema(type_name: &str) -> anyhow::Result<Schema> {
    let schema = match type_name.trim().replace('-', "_").as_str() {
        "funding_request" => schema_for!(FundingRequest),
        "expense_report" => schema_for!(ExpenseReport),
        "reimbursement_claim" => schema_for!(ReimbursementClaim),
        "attachment" => schema_for!(Attachment),
        "status_history" => schema_for!(StatusHistoryEntry),
        "audit_log" => schema_for!(AuditEntry),
        "requester_snapshot" => schema_for!(RequesterSnapshot),
        "actor_profile" => schema_for!(ActorProfile),
        _ => bail!(
            "unknown schema type '{type_name}' (expected one of: {})",
            KNOWN.join(", ")
        ),
    };
    Ok(schema)
}
