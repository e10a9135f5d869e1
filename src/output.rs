//! TSV and JSON-lines rendering of store state.
//!
//! TSV is one record per line with tab-separated columns. JSON mode writes
//! one serialized object per line.

use std::io::{self, Write};

use buddy::types::Currency;
use buddy::{Activity, ExpenseSimple, FriendSummary, GroupSummary, LedgerEntry, Member, Session};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;

/// Signed amount with two decimals, e.g. `+A$12.50` or `-3.00`.
fn money(amount: Decimal, symbol: &str) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        '-'
    } else {
        '+'
    };
    let mut abs = amount.abs().round_dp(2);
    abs.rescale(2);
    format!("{sign}{symbol}{abs}")
}

fn ledger_column(entries: &[LedgerEntry], symbol: &str) -> String {
    if entries.is_empty() {
        return "settled".to_string();
    }
    entries
        .iter()
        .map(|e| format!("{} {}", e.counterparty_name, money(e.signed_amount(), symbol)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn write_json_line<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *w, value)?;
    w.write_all(b"\n")
}

pub fn write_session<W: Write>(w: &mut W, session: &Session, json: bool) -> io::Result<()> {
    if json {
        // The token stays out of the output.
        write_json_line(
            w,
            &json!({
                "userId": session.user_id,
                "email": session.email,
                "name": session.name,
                "avatar": session.avatar,
                "exp": session.exp,
            }),
        )?;
    } else {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            session.user_id.map_or_else(|| "-".to_string(), |id| id.to_string()),
            session.email.as_deref().unwrap_or("-"),
            session.name.as_deref().unwrap_or("-"),
            session.exp.map_or_else(|| "-".to_string(), |exp| exp.to_string()),
        )?;
    }
    w.flush()
}

/// One row per group: id, name, type, currency, net balance, ledger.
///
/// `symbol` maps a currency to its display symbol from the session catalog.
pub fn write_groups<W, F>(
    w: &mut W,
    groups: &[GroupSummary],
    json: bool,
    symbol: F,
) -> io::Result<()>
where
    W: Write,
    F: Fn(Currency) -> Option<String>,
{
    for group in groups {
        if json {
            write_json_line(w, group)?;
            continue;
        }
        let sym = symbol(group.currency).unwrap_or_default();
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            group.id,
            group.name,
            group.group_type,
            group.currency,
            money(group.net_balance, &sym),
            ledger_column(&group.ledger_entries, &sym),
        )?;
    }
    w.flush()
}

pub fn write_friends<W: Write>(w: &mut W, friends: &[FriendSummary], json: bool) -> io::Result<()> {
    for friend in friends {
        if json {
            write_json_line(w, friend)?;
            continue;
        }
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            friend.id,
            friend.name,
            friend.email.as_deref().unwrap_or("-"),
            money(friend.net_balance, ""),
            ledger_column(&friend.ledger_entries, ""),
        )?;
    }
    w.flush()
}

pub fn write_activities<W: Write>(
    w: &mut W,
    activities: &[Activity],
    json: bool,
) -> io::Result<()> {
    for activity in activities {
        if json {
            write_json_line(w, activity)?;
            continue;
        }
        writeln!(
            w,
            "{}\t{}\t{}",
            activity.id,
            activity.created_at.as_deref().unwrap_or("-"),
            activity.content,
        )?;
    }
    w.flush()
}

/// Members first, then expenses, each row tagged with its kind.
pub fn write_group_detail<W: Write>(
    w: &mut W,
    group_id: i64,
    members: &[Member],
    expenses: &[ExpenseSimple],
    json: bool,
) -> io::Result<()> {
    if json {
        write_json_line(
            w,
            &json!({
                "groupId": group_id,
                "members": members,
                "expenses": expenses,
            }),
        )?;
        return w.flush();
    }
    for member in members {
        writeln!(
            w,
            "member\t{}\t{}\t{}",
            member.id,
            member.name,
            member.email.as_deref().unwrap_or("-"),
        )?;
    }
    for expense in expenses {
        let mut amount = expense.amount.round_dp(2);
        amount.rescale(2);
        writeln!(
            w,
            "expense\t{}\t{}\t{}\t{}\t{}",
            expense.id,
            expense.expense_type,
            amount,
            expense.description,
            expense.payer_name.as_deref().unwrap_or("-"),
        )?;
    }
    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy::types::{ExpenseType, GroupType};
    use buddy::Direction;
    use rust_decimal_macros::dec;

    fn entry(name: &str, amount: Decimal, direction: Direction) -> LedgerEntry {
        LedgerEntry {
            counterparty_name: name.into(),
            amount,
            direction,
        }
    }

    fn group() -> GroupSummary {
        GroupSummary {
            id: 7,
            name: "Tasmania".into(),
            group_type: GroupType::Trip,
            currency: Currency::Aud,
            ledger_entries: vec![
                entry("Zoe", dec!(40), Direction::Get),
                entry("Mia", dec!(5.5), Direction::Owe),
            ],
            net_balance: dec!(34.5),
        }
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(dec!(34.5), "A$"), "+A$34.50");
        assert_eq!(money(dec!(-3), ""), "-3.00");
        assert_eq!(money(dec!(0), "$"), "+$0.00");
        assert_eq!(money(dec!(1.005), ""), "+1.00");
    }

    #[test]
    fn test_groups_tsv() {
        let mut out = Vec::new();
        write_groups(&mut out, &[group()], false, |c| {
            (c == Currency::Aud).then(|| "A$".to_string())
        })
        .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "7\tTasmania\tTRIP\tAUD\t+A$34.50\tZoe +A$40.00, Mia -A$5.50\n"
        );
    }

    #[test]
    fn test_groups_json_lines() {
        let mut out = Vec::new();
        write_groups(&mut out, &[group(), group()], true, |_| None).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let value: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(value["type"], "TRIP");
        assert_eq!(value["ledgerEntries"][1]["direction"], "owe");
    }

    #[test]
    fn test_settled_friend() {
        let friend = FriendSummary {
            id: 3,
            name: "Bea".into(),
            email: None,
            avatar: None,
            ledger_entries: vec![],
            net_balance: Decimal::ZERO,
        };
        let mut out = Vec::new();
        write_friends(&mut out, &[friend], false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "3\tBea\t-\t+0.00\tsettled\n");
    }

    #[test]
    fn test_activity_without_timestamp() {
        let activity = Activity {
            id: 1,
            content: "Bea joined".into(),
            group_id: None,
            created_at: None,
        };
        let mut out = Vec::new();
        write_activities(&mut out, &[activity], false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "1\t-\tBea joined\n");
    }

    #[test]
    fn test_session_json_hides_token() {
        let mut session = Session::signed_out("p");
        session.token = Some("secret.token.value".into());
        session.email = Some("ana@example.com".into());
        let mut out = Vec::new();
        write_session(&mut out, &session, true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("secret"));
        assert!(text.contains("ana@example.com"));
    }

    #[test]
    fn test_group_detail_tsv() {
        let members = vec![Member {
            id: 1,
            name: "Ana".into(),
            email: Some("ana@example.com".into()),
            avatar: None,
        }];
        let expenses = vec![ExpenseSimple {
            id: 10,
            description: "Dinner".into(),
            amount: dec!(84.2),
            expense_type: ExpenseType::Food,
            payer_name: None,
            date: None,
        }];
        let mut out = Vec::new();
        write_group_detail(&mut out, 7, &members, &expenses, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "member\t1\tAna\tana@example.com\nexpense\t10\tFOOD\t84.20\tDinner\t-\n"
        );
    }
}
