//! Entity structs for all Expensa domain objects.
//!
//! Each entity is stored as a JSON document keyed by its `EntityType`. All
//! structs derive `Serialize`, `Deserialize`, and `JsonSchema` for JSON
//! roundtrip and schema validation.

mod attachment;
mod audit;
mod expense_report;
mod funding_request;
mod history;
mod reimbursement_claim;
mod snapshot;

pub use attachment::{Attachment, AttachmentState};
pub use audit::AuditEntry;
pub use expense_report::ExpenseReport;
pub use funding_request::FundingRequest;
pub use history::StatusHistoryEntry;
pub use reimbursement_claim::ReimbursementClaim;
pub use snapshot::RequesterSnapshot;
