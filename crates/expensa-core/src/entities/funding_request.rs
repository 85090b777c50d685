use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::RequesterSnapshot;
use crate::enums::FundingRequestStatus;

/// A request for program funds, the head of the reimbursement chain.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FundingRequest {
    pub id: String,
    pub status: FundingRequestStatus,
    pub created_by: String,
    pub title: String,
    #[serde(default)]
    pub purpose: Option<String>,
    pub amount_requested: Decimal,
    #[serde(default)]
    pub amount_approved: Option<Decimal>,
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
