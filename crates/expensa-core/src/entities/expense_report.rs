use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::ExpenseReportStatus;

/// Settlement of how the funds of a `FundingRequest` were spent.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ExpenseReport {
    pub id: String,
    pub status: ExpenseReportStatus,
    pub created_by: String,
    pub funding_request_id: String,
    pub title: String,
    pub amount_spent: Decimal,
    /// Unspent funds handed back to the program.
    #[serde(default)]
    pub amount_returned: Option<Decimal>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub analysis_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub analyst_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
