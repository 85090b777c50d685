//! ID prefix constants.
//!
//! Every stored row gets an id of the form `{prefix}-{hex}`; the prefix tells
//! a reader which entity type an id belongs to.

use crate::enums::EntityType;

pub const PREFIX_FUNDING_REQUEST: &str = "fr";
pub const PREFIX_EXPENSE_REPORT: &str = "er";
pub const PREFIX_REIMBURSEMENT_CLAIM: &str = "rc";
pub const PREFIX_EXPENSE_ITEM: &str = "itm";
pub const PREFIX_STATUS_HISTORY: &str = "hst";
pub const PREFIX_AUDIT: &str = "aud";
pub const PREFIX_ATTACHMENT: &str = "att";

pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_FUNDING_REQUEST,
    PREFIX_EXPENSE_REPORT,
    PREFIX_REIMBURSEMENT_CLAIM,
    PREFIX_EXPENSE_ITEM,
    PREFIX_STATUS_HISTORY,
    PREFIX_AUDIT,
    PREFIX_ATTACHMENT,
];

/// Id prefix for rows of the given entity type.
#[must_use]
pub const fn prefix_for(entity: EntityType) -> &'static str {
    match entity {
        EntityType::FundingRequest => PREFIX_FUNDING_REQUEST,
        EntityType::ExpenseReport => PREFIX_EXPENSE_REPORT,
        EntityType::ReimbursementClaim => PREFIX_REIMBURSEMENT_CLAIM,
        EntityType::ExpenseItem => PREFIX_EXPENSE_ITEM,
        EntityType::StatusHistory => PREFIX_STATUS_HISTORY,
        EntityType::AuditLog => PREFIX_AUDIT,
        EntityType::Attachment => PREFIX_ATTACHMENT,
    }
}
