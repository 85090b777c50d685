use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::RequesterSnapshot;
use crate::enums::ReimbursementClaimStatus;

/// A claim to be paid back for out-of-pocket expenses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ReimbursementClaim {
    pub id: String,
    pub status: ReimbursementClaimStatus,
    pub created_by: String,
    #[serde(default)]
    pub funding_request_id: Option<String>,
    #[serde(default)]
    pub expense_report_id: Option<String>,
    pub title: String,
    pub amount_claimed: Decimal,
    #[serde(default)]
    pub requester_snapshot: Option<RequesterSnapshot>,
    #[serde(default)]
    pub analysis_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub analyst_email: Option<String>,
    #[serde(default)]
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
