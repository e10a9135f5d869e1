use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::ExpenseType;

/// Expense row as returned by `GET /expenses/group/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseSimple {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    #[serde(default)]
    pub payer_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

/// The non-split part of a new expense.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub group_id: i64,
    pub description: String,
    pub expense_type: ExpenseType,
    pub payer_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseShare {
    pub user_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Body of `POST /expenses`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub group_id: i64,
    pub description: String,
    #[serde(rename = "type")]
    pub expense_type: ExpenseType,
    pub payer_id: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub equal: bool,
    pub shares: Vec<ExpenseShare>,
}
