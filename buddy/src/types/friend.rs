use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amounts::OrderedAmounts;
use crate::balance::LedgerEntry;

/// Friend record as returned by `GET /friends`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Friend {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub owes_current_user: OrderedAmounts,
    #[serde(default)]
    pub current_user_owes: OrderedAmounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendSummary {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub ledger_entries: Vec<LedgerEntry>,
    pub net_balance: Decimal,
}

/// Body of `POST /friends`.
#[derive(Debug, Clone, Serialize)]
pub struct AddFriendRequest {
    pub email: String,
}
