use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amounts::OrderedAmounts;
use super::catalog::{Currency, GroupType};
use crate::balance::LedgerEntry;

/// Group record as returned by `GET /groups/detail`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub currency: Currency,
    /// Amounts other members owe the current user, by member name.
    #[serde(default)]
    pub owes_current_user: OrderedAmounts,
    /// Amounts the current user owes other members, by member name.
    #[serde(default)]
    pub current_user_owes: OrderedAmounts,
}

/// A group with its balances flattened into ledger entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub currency: Currency,
    pub ledger_entries: Vec<LedgerEntry>,
    /// `sum(Get) - sum(Owe)` over `ledger_entries`.
    pub net_balance: Decimal,
}

/// Body of `POST /groups`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub group_type: GroupType,
    pub currency: Currency,
}

/// Body of `POST /groups/{id}/settle`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    pub counterparty_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Group member as returned by `GET /groups/{id}/members`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}
