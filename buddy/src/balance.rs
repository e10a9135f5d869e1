//! Turns raw per-counterparty balance maps into signed ledger entries.
//!
//! Everything here is pure: identical input yields identical output.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{BuddyError, Result};
use crate::types::{Friend, FriendSummary, Group, GroupSummary, OrderedAmounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The current user owes the counterparty.
    Owe,
    /// The counterparty owes the current user.
    Get,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub counterparty_name: String,
    pub amount: Decimal,
    pub direction: Direction,
}

impl LedgerEntry {
    /// Amount signed from the current user's point of view.
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Get => self.amount,
            Direction::Owe => -self.amount,
        }
    }
}

/// Build ledger entries and the net balance from the two raw maps.
///
/// Entries owed to the user come first (tagged `Get`), then entries owed by
/// the user (tagged `Owe`), each in source order. Explicit zero amounts are
/// kept. Fails only if the net balance does not fit in a `Decimal`.
pub fn ledger(
    owes_current_user: &OrderedAmounts,
    current_user_owes: &OrderedAmounts,
) -> Result<(Vec<LedgerEntry>, Decimal)> {
    let get = owes_current_user
        .iter()
        .map(|(name, amount)| entry(name, amount, Direction::Get));
    let owe = current_user_owes
        .iter()
        .map(|(name, amount)| entry(name, amount, Direction::Owe));
    let entries: Vec<LedgerEntry> = get.chain(owe).collect();

    let net = owes_current_user
        .total()
        .zip(current_user_owes.total())
        .and_then(|(get, owe)| get.checked_sub(owe))
        .ok_or(BuddyError::Overflow("net balance"))?;
    Ok((entries, net))
}

fn entry(name: &str, amount: Decimal, direction: Direction) -> LedgerEntry {
    LedgerEntry {
        counterparty_name: name.to_string(),
        amount,
        direction,
    }
}

/// Signed sum of `entries`, or `None` on overflow.
pub fn net_of(entries: &[LedgerEntry]) -> Option<Decimal> {
    entries
        .iter()
        .try_fold(Decimal::ZERO, |acc, e| acc.checked_add(e.signed_amount()))
}

pub fn summarize_group(group: &Group) -> Result<GroupSummary> {
    let (ledger_entries, net_balance) =
        ledger(&group.owes_current_user, &group.current_user_owes)?;
    Ok(GroupSummary {
        id: group.id,
        name: group.name.clone(),
        group_type: group.group_type,
        currency: group.currency,
        ledger_entries,
        net_balance,
    })
}

pub fn summarize_groups(groups: &[Group]) -> Result<Vec<GroupSummary>> {
    groups.iter().map(summarize_group).collect()
}

pub fn summarize_friend(friend: &Friend) -> Result<FriendSummary> {
    let (ledger_entries, net_balance) =
        ledger(&friend.owes_current_user, &friend.current_user_owes)?;
    Ok(FriendSummary {
        id: friend.id,
        name: friend.name.clone(),
        email: friend.email.clone(),
        avatar: friend.avatar.clone(),
        ledger_entries,
        net_balance,
    })
}

pub fn summarize_friends(friends: &[Friend]) -> Result<Vec<FriendSummary>> {
    friends.iter().map(summarize_friend).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Currency, GroupType};
    use rust_decimal_macros::dec;

    fn amounts(pairs: &[(&str, Decimal)]) -> OrderedAmounts {
        pairs.iter().map(|(n, a)| (*n, *a)).collect()
    }

    fn group(get: &[(&str, Decimal)], owe: &[(&str, Decimal)]) -> Group {
        Group {
            id: 7,
            name: "Flat".into(),
            group_type: GroupType::Home,
            currency: Currency::Aud,
            owes_current_user: amounts(get),
            current_user_owes: amounts(owe),
        }
    }

    #[test]
    fn test_get_entries_precede_owe_entries_in_source_order() {
        let g = group(
            &[("zoe", dec!(10)), ("adam", dec!(2.50))],
            &[("mia", dec!(4)), ("bob", dec!(1.25))],
        );
        let summary = summarize_group(&g).unwrap();
        let order: Vec<(&str, Direction)> = summary
            .ledger_entries
            .iter()
            .map(|e| (e.counterparty_name.as_str(), e.direction))
            .collect();
        assert_eq!(
            order,
            vec![
                ("zoe", Direction::Get),
                ("adam", Direction::Get),
                ("mia", Direction::Owe),
                ("bob", Direction::Owe),
            ]
        );
        assert_eq!(summary.net_balance, dec!(7.25));
    }

    #[test]
    fn test_net_balance_matches_signed_entry_sum() {
        let cases = [
            group(&[], &[]),
            group(&[("a", dec!(3.33))], &[]),
            group(&[], &[("b", dec!(9.99))]),
            group(&[("a", dec!(1)), ("c", dec!(0))], &[("b", dec!(100.01))]),
        ];
        for g in &cases {
            let summary = summarize_group(g).unwrap();
            assert_eq!(Some(summary.net_balance), net_of(&summary.ledger_entries));
            assert_eq!(
                summary.net_balance,
                g.owes_current_user.total().unwrap() - g.current_user_owes.total().unwrap()
            );
            assert_eq!(
                summary.ledger_entries.len(),
                g.owes_current_user.len() + g.current_user_owes.len()
            );
        }
    }

    #[test]
    fn test_explicit_zero_is_kept() {
        let g = group(&[("a", dec!(0))], &[]);
        let summary = summarize_group(&g).unwrap();
        assert_eq!(summary.ledger_entries.len(), 1);
        assert_eq!(summary.ledger_entries[0].amount, dec!(0));
        assert_eq!(summary.net_balance, dec!(0));
    }

    #[test]
    fn test_same_name_in_both_maps_yields_two_entries() {
        let g = group(&[("sam", dec!(5))], &[("sam", dec!(2))]);
        let summary = summarize_group(&g).unwrap();
        assert_eq!(summary.ledger_entries.len(), 2);
        assert_eq!(summary.net_balance, dec!(3));
    }

    #[test]
    fn test_transform_is_deterministic() {
        let groups = vec![
            group(&[("a", dec!(1))], &[("b", dec!(2))]),
            group(&[("c", dec!(3))], &[]),
        ];
        assert_eq!(
            summarize_groups(&groups).unwrap(),
            summarize_groups(&groups).unwrap()
        );
    }

    #[test]
    fn test_summarize_friend_carries_profile() {
        let friend = Friend {
            id: 3,
            name: "Ana".into(),
            email: Some("ana@example.com".into()),
            avatar: None,
            owes_current_user: amounts(&[("Ana", dec!(12.40))]),
            current_user_owes: OrderedAmounts::new(),
        };
        let summary = summarize_friend(&friend).unwrap();
        assert_eq!(summary.email.as_deref(), Some("ana@example.com"));
        assert_eq!(summary.net_balance, dec!(12.40));
        assert_eq!(summary.ledger_entries[0].direction, Direction::Get);
    }

    #[test]
    fn test_overflowing_balances_are_an_error() {
        let g = group(&[("a", Decimal::MAX), ("b", dec!(1))], &[]);
        assert!(matches!(summarize_group(&g), Err(BuddyError::Overflow(_))));

        let g = group(&[("a", Decimal::MAX)], &[("b", Decimal::MAX)]);
        assert_eq!(summarize_group(&g).unwrap().net_balance, Decimal::ZERO);

        let g = group(&[("a", Decimal::MAX)], &[("b", Decimal::MIN)]);
        assert!(matches!(summarize_group(&g), Err(BuddyError::Overflow(_))));
    }
}
