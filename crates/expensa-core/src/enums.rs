//! Status enums, roles, entity types, and actions for Expensa.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Lifecycle status enums only describe the state set; which moves are legal
//! for which role lives in [`crate::transitions`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Role / RoleTier
// ---------------------------------------------------------------------------

/// Authenticated role of the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Requester,
    Manager,
}

/// Coarse capability bucket used to key the transition tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoleTier {
    Admin,
    Submitter,
}

/// Role to transition-table key. Adding a role tier is an edit here.
pub const ROLE_TIERS: &[(Role, RoleTier)] = &[
    (Role::Admin, RoleTier::Admin),
    (Role::Requester, RoleTier::Submitter),
    (Role::Manager, RoleTier::Submitter),
];

impl Role {
    pub const ALL: &'static [Self] = &[Self::Admin, Self::Requester, Self::Manager];

    /// Look up the tier this role acts under.
    #[must_use]
    pub fn tier(self) -> RoleTier {
        ROLE_TIERS
            .iter()
            .find(|(role, _)| *role == self)
            .map_or(RoleTier::Submitter, |(_, tier)| *tier)
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        self.tier() == RoleTier::Admin
    }

    /// Map an identity-provider role claim onto a role.
    ///
    /// Unknown claims belong to an authenticated user, so they land in the
    /// least privileged role rather than failing.
    #[must_use]
    pub fn from_claim(claim: &str) -> Self {
        match claim.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" => Self::Admin,
            "manager" => Self::Manager,
            _ => Self::Requester,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Requester => "requester",
            Self::Manager => "manager",
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown role '{s}'")))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RoleTier {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Submitter => "submitter",
        }
    }
}

impl fmt::Display for RoleTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FundingRequestStatus
// ---------------------------------------------------------------------------

/// Status of a funding request.
///
/// ```text
/// draft → pending → under_analysis → approved → paid → confirmed
///                                  → rejected → pending
///                                                    → cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FundingRequestStatus {
    Draft,
    Pending,
    UnderAnalysis,
    Approved,
    Rejected,
    Paid,
    Confirmed,
    Cancelled,
}

impl FundingRequestStatus {
    pub const ALL: &'static [Self] = &[
        Self::Draft,
        Self::Pending,
        Self::UnderAnalysis,
        Self::Approved,
        Self::Rejected,
        Self::Paid,
        Self::Confirmed,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::UnderAnalysis => "under_analysis",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Paid => "paid",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FundingRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ExpenseReportStatus
// ---------------------------------------------------------------------------

/// Status of an expense report (settlement of a funded request).
///
/// ```text
/// draft → pending → under_analysis → approved
///                                  → rejected → pending
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseReportStatus {
    Draft,
    Pending,
    UnderAnalysis,
    Approved,
    Rejected,
}

impl ExpenseReportStatus {
    pub const ALL: &'static [Self] = &[
        Self::Draft,
        Self::Pending,
        Self::UnderAnalysis,
        Self::Approved,
        Self::Rejected,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::UnderAnalysis => "under_analysis",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ExpenseReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ReimbursementClaimStatus
// ---------------------------------------------------------------------------

/// Status of a reimbursement claim.
///
/// ```text
/// draft → pending → under_analysis → approved → paid → confirmed
///       → cancelled                → rejected → pending
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReimbursementClaimStatus {
    Draft,
    Pending,
    UnderAnalysis,
    Approved,
    Rejected,
    Paid,
    Confirmed,
    Cancelled,
}

impl ReimbursementClaimStatus {
    pub const ALL: &'static [Self] = &[
        Self::Draft,
        Self::Pending,
        Self::UnderAnalysis,
        Self::Approved,
        Self::Rejected,
        Self::Paid,
        Self::Confirmed,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::UnderAnalysis => "under_analysis",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Paid => "paid",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReimbursementClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AttachmentOrigin
// ---------------------------------------------------------------------------

/// Which side of the process produced an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentOrigin {
    Admin,
    Submitter,
}

impl AttachmentOrigin {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Submitter => "submitter",
        }
    }
}

impl fmt::Display for AttachmentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Kind of action recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Upload,
    Replace,
    Download,
    StatusChange,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Upload => "upload",
            Self::Replace => "replace",
            Self::Download => "download",
            Self::StatusChange => "status_change",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Entity type name keying every Entity Store call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    FundingRequest,
    ExpenseReport,
    ReimbursementClaim,
    ExpenseItem,
    StatusHistory,
    AuditLog,
    Attachment,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FundingRequest => "funding_request",
            Self::ExpenseReport => "expense_report",
            Self::ReimbursementClaim => "reimbursement_claim",
            Self::ExpenseItem => "expense_item",
            Self::StatusHistory => "status_history",
            Self::AuditLog => "audit_log",
            Self::Attachment => "attachment",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OwnerType
// ---------------------------------------------------------------------------

/// Owner half of an attachment's composite foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OwnerType {
    FundingRequest,
    ExpenseReport,
    ReimbursementClaim,
    ExpenseItem,
}

impl OwnerType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FundingRequest => "funding_request",
            Self::ExpenseReport => "expense_report",
            Self::ReimbursementClaim => "reimbursement_claim",
            Self::ExpenseItem => "expense_item",
        }
    }

    /// The entity type an owner id resolves against.
    #[must_use]
    pub const fn entity_type(self) -> EntityType {
        match self {
            Self::FundingRequest => EntityType::FundingRequest,
            Self::ExpenseReport => EntityType::ExpenseReport,
            Self::ReimbursementClaim => EntityType::ReimbursementClaim,
            Self::ExpenseItem => EntityType::ExpenseItem,
        }
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
