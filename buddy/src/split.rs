//! Expense split calculator.
//!
//! Holds the transient state of an expense being entered: the total, the
//! split method, the selected participants and, for unequal splits, the
//! amount typed for each participant. Amounts are kept as the strings the
//! user typed so that partially-entered values (`"12."`) survive until blur.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::ExpenseShare;

/// Longest integer part accepted for an amount, leading zeros excluded.
pub const MAX_INTEGER_DIGITS: usize = 15;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplitError {
    #[error("invalid amount {0:?}: expected a non-negative number like 1234.56")]
    InvalidAmount(String),

    #[error("the total is derived from participant amounts in an unequal split")]
    TotalIsDerived,

    #[error("participant amounts can only be entered in an unequal split")]
    NotUnequal,

    #[error("amount must be greater than zero and at least one participant selected")]
    Incomplete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMethod {
    #[default]
    Equal,
    Unequal,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseSplit {
    total_amount: String,
    method: SplitMethod,
    selected: BTreeSet<i64>,
    per_participant: BTreeMap<i64, String>,
}

impl ExpenseSplit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_amount(&self) -> &str {
        &self.total_amount
    }

    pub fn method(&self) -> SplitMethod {
        self.method
    }

    pub fn selected(&self) -> &BTreeSet<i64> {
        &self.selected
    }

    pub fn is_selected(&self, participant: i64) -> bool {
        self.selected.contains(&participant)
    }

    pub fn participant_amount(&self, participant: i64) -> Option<&str> {
        self.per_participant.get(&participant).map(String::as_str)
    }

    pub fn per_participant(&self) -> &BTreeMap<i64, String> {
        &self.per_participant
    }

    /// Edit the total directly. Only allowed in an equal split.
    pub fn set_total_amount(&mut self, input: &str) -> Result<(), SplitError> {
        if self.method == SplitMethod::Unequal {
            return Err(SplitError::TotalIsDerived);
        }
        check_amount(input)?;
        self.total_amount = input.to_string();
        Ok(())
    }

    /// Pad the total to exactly two decimals, as when the input loses focus.
    pub fn blur_total_amount(&mut self) {
        if self.method == SplitMethod::Equal {
            self.total_amount = pad_amount(&self.total_amount);
        }
    }

    /// Flip a participant's selection.
    ///
    /// In an unequal split, deselecting also drops the participant's amount
    /// and the total is recomputed.
    pub fn toggle_participant(&mut self, participant: i64) {
        if self.selected.remove(&participant) {
            if self.method == SplitMethod::Unequal {
                self.per_participant.remove(&participant);
                self.recompute_total();
            }
        } else {
            self.selected.insert(participant);
        }
    }

    /// Enter one participant's share of an unequal split.
    ///
    /// A non-zero amount selects the participant; an empty amount removes the
    /// entry and deselects them. The total is recomputed either way.
    pub fn set_participant_amount(&mut self, participant: i64, input: &str) -> Result<(), SplitError> {
        if self.method != SplitMethod::Unequal {
            return Err(SplitError::NotUnequal);
        }
        check_amount(input)?;
        let amount = parse_amount(input)?;
        let others = sum_amounts(
            self.per_participant
                .iter()
                .filter(|(id, _)| **id != participant)
                .map(|(_, a)| a),
        )?;
        let total = others
            .checked_add(amount)
            .ok_or_else(|| SplitError::InvalidAmount(input.to_string()))?;

        if input.is_empty() {
            self.per_participant.remove(&participant);
            self.selected.remove(&participant);
        } else {
            if amount > Decimal::ZERO {
                self.selected.insert(participant);
            }
            self.per_participant.insert(participant, input.to_string());
        }
        self.total_amount = format_amount(total);
        Ok(())
    }

    /// Pad one participant's amount to two decimals.
    pub fn blur_participant_amount(&mut self, participant: i64) {
        if let Some(amount) = self.per_participant.get_mut(&participant) {
            *amount = pad_amount(amount);
        }
    }

    /// Switch the split method.
    ///
    /// Entering an unequal split drops amounts of participants that are no
    /// longer selected and derives the total. Leaving it clears the total;
    /// selection and amounts are kept for when it is re-entered.
    pub fn set_method(&mut self, method: SplitMethod) {
        if method == self.method {
            return;
        }
        self.method = method;
        match method {
            SplitMethod::Unequal => {
                let selected = &self.selected;
                self.per_participant.retain(|id, _| selected.contains(id));
                self.recompute_total();
            }
            SplitMethod::Equal => self.total_amount.clear(),
        }
    }

    /// The total as a number, if one has been entered.
    pub fn total(&self) -> Option<Decimal> {
        if self.total_amount.is_empty() {
            None
        } else {
            parse_amount(&self.total_amount).ok()
        }
    }

    /// Whether the split may be submitted: a positive total and at least one
    /// selected participant.
    pub fn is_valid(&self) -> bool {
        self.total().is_some_and(|t| t > Decimal::ZERO) && !self.selected.is_empty()
    }

    /// Per-participant shares of a valid split, ordered by participant id.
    ///
    /// An equal split divides the total in cents; leftover cents go one each
    /// to the lowest ids so the shares always add up to the total.
    pub fn shares(&self) -> Result<Vec<ExpenseShare>, SplitError> {
        if !self.is_valid() {
            return Err(SplitError::Incomplete);
        }

        match self.method {
            SplitMethod::Equal => {
                let cents = parse_amount(&self.total_amount)?
                    .checked_mul(Decimal::ONE_HUNDRED)
                    .and_then(|c| c.to_i64())
                    .ok_or_else(|| SplitError::InvalidAmount(self.total_amount.clone()))?;
                let count = self.selected.len() as i64;
                let base = cents / count;
                let remainder = (cents % count) as usize;
                Ok(self
                    .selected
                    .iter()
                    .enumerate()
                    .map(|(i, id)| ExpenseShare {
                        user_id: *id,
                        amount: Decimal::new(base + i64::from(i < remainder), 2),
                    })
                    .collect())
            }
            SplitMethod::Unequal => self
                .selected
                .iter()
                .map(|id| {
                    let amount = match self.per_participant.get(id) {
                        Some(a) => parse_amount(a)?,
                        None => Decimal::ZERO,
                    };
                    Ok(ExpenseShare {
                        user_id: *id,
                        amount,
                    })
                })
                .collect(),
        }
    }

    /// Refresh the total after entries were removed. A subset of entries
    /// whose sum was already checked cannot overflow.
    fn recompute_total(&mut self) {
        if let Ok(sum) = sum_amounts(self.per_participant.values()) {
            self.total_amount = format_amount(sum);
        }
    }
}

/// Accept `""` or a non-negative decimal with at most [`MAX_INTEGER_DIGITS`]
/// integer digits and two fraction digits.
fn check_amount(input: &str) -> Result<(), SplitError> {
    if input.is_empty() {
        return Ok(());
    }
    let (int, frac) = match input.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (input, None),
    };
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    let int_ok = digits_only(int) && int.trim_start_matches('0').len() <= MAX_INTEGER_DIGITS;
    let frac_ok = frac.map_or(true, |f| f.len() <= 2 && digits_only(f));
    let has_digit = !int.is_empty() || frac.is_some_and(|f| !f.is_empty());

    if int_ok && frac_ok && has_digit {
        Ok(())
    } else {
        Err(SplitError::InvalidAmount(input.to_string()))
    }
}

/// Normalise a checked amount to exactly two decimals: `"12"` -> `"12.00"`,
/// `"12.5"` -> `"12.50"`, `".5"` -> `"0.50"`. Empty stays empty.
pub fn pad_amount(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    let (int, frac) = input.split_once('.').unwrap_or((input, ""));
    let int = int.trim_start_matches('0');
    let int = if int.is_empty() { "0" } else { int };
    format!("{int}.{frac:0<2}")
}

/// Parse a checked amount. The empty string is zero.
fn parse_amount(input: &str) -> Result<Decimal, SplitError> {
    if input.is_empty() {
        return Ok(Decimal::ZERO);
    }
    pad_amount(input)
        .parse()
        .map_err(|_| SplitError::InvalidAmount(input.to_string()))
}

fn sum_amounts<'a>(mut amounts: impl Iterator<Item = &'a String>) -> Result<Decimal, SplitError> {
    amounts.try_fold(Decimal::ZERO, |acc, a| {
        acc.checked_add(parse_amount(a)?)
            .ok_or_else(|| SplitError::InvalidAmount(a.clone()))
    })
}

fn format_amount(amount: Decimal) -> String {
    let mut amount = amount.round_dp(2);
    amount.rescale(2);
    amount.to_string()
}
