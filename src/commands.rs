//! Subcommand handlers.
//!
//! Every handler except the sign-in ones checks the session first, so an
//! expired token logs the user out before any request is made.

use std::io::{self, Write};

use buddy::types::{CreateGroupRequest, ExpenseDraft};
use buddy::{
    Buddy, BuddyError, CatalogKey, Currency, ExpenseSplit, ExpenseType, GroupDetailStore,
    GroupType, LoadOutcome, PaginatedStore, SplitMethod, NETWORK_ERROR,
};
use tracing::info;

use crate::cli::{AddExpenseArgs, Command};
use crate::error::CliError;
use crate::output;

pub async fn run(buddy: &Buddy, command: Command, json: bool) -> Result<(), CliError> {
    let mut out = io::stdout();

    match command {
        Command::Login(args) => {
            let ok = buddy.session.login(&args.email, &args.password).await;
            finish_auth(buddy, ok, json)
        }

        Command::LoginGoogle(args) => {
            let ok = buddy.session.login_with_google(&args.token).await;
            finish_auth(buddy, ok, json)
        }

        Command::Register(args) => {
            let ok = buddy
                .session
                .register(&args.email, &args.password, &args.given_name, &args.family_name)
                .await;
            finish_auth(buddy, ok, json)
        }

        Command::Logout => {
            buddy.logout();
            Ok(())
        }

        Command::Whoami => {
            buddy.require_active()?;
            output::write_session(&mut out, &buddy.session.session(), json)?;
            Ok(())
        }

        Command::Groups(args) => {
            buddy.require_active()?;
            let outcome = if args.all {
                buddy.groups.load_all().await
            } else {
                buddy.groups.fetch_groups().await
            };
            check(outcome, buddy.groups.list(), "groups")?;
            write_groups(buddy, json)
        }

        Command::Friends(args) => {
            buddy.require_active()?;
            let outcome = if args.all {
                buddy.friends.load_all().await
            } else {
                buddy.friends.fetch_friends().await
            };
            check(outcome, buddy.friends.list(), "friends")?;
            output::write_friends(&mut out, &buddy.friends.friends(), json)?;
            Ok(())
        }

        Command::Activities(args) => {
            buddy.require_active()?;
            let outcome = if args.all {
                buddy.activities.load_all().await
            } else {
                buddy.activities.fetch_activities().await
            };
            check(outcome, buddy.activities.list(), "activities")?;
            output::write_activities(&mut out, &buddy.activities.activities(), json)?;
            Ok(())
        }

        Command::Group(args) => {
            buddy.require_active()?;
            let detail = &buddy.group_detail;
            detail.select_group(args.id);
            let (members, expenses) = detail.refresh().await;
            check(members, detail.members(), "members")?;
            check(expenses, detail.expenses(), "expenses")?;
            output::write_group_detail(
                &mut out,
                args.id,
                &detail.members().items(),
                &detail.expenses().items(),
                json,
            )?;
            Ok(())
        }

        Command::CreateGroup(args) => {
            buddy.require_active()?;
            let req = CreateGroupRequest {
                name: args.name,
                group_type: parse_key::<GroupType>(&args.group_type, "group type")?,
                currency: parse_key::<Currency>(&args.currency, "currency")?,
            };
            buddy.groups.create_group(&req).await?;
            write_groups(buddy, json)
        }

        Command::AddFriend(args) => {
            buddy.require_active()?;
            buddy.friends.add_friend(&args.email).await?;
            output::write_friends(&mut out, &buddy.friends.friends(), json)?;
            Ok(())
        }

        Command::AddExpense(args) => {
            buddy.require_active()?;
            add_expense(&buddy.group_detail, args, &mut out, json).await
        }

        Command::Settle(args) => {
            buddy.require_active()?;
            buddy
                .groups
                .settle(args.group_id, &args.counterparty, args.amount)
                .await?;
            write_groups(buddy, json)
        }
    }
}

fn finish_auth(buddy: &Buddy, ok: bool, json: bool) -> Result<(), CliError> {
    if !ok {
        let message = buddy
            .session
            .error()
            .unwrap_or_else(|| NETWORK_ERROR.to_string());
        return Err(CliError::Auth(message));
    }
    output::write_session(&mut io::stdout(), &buddy.session.session(), json)?;
    Ok(())
}

fn write_groups(buddy: &Buddy, json: bool) -> Result<(), CliError> {
    output::write_groups(&mut io::stdout(), &buddy.groups.groups(), json, |currency| {
        buddy.session.currency_symbol(currency)
    })?;
    Ok(())
}

/// Turn a failed load into an error carrying the list's message.
fn check<T>(
    outcome: LoadOutcome,
    list: &PaginatedStore<T>,
    what: &'static str,
) -> Result<(), CliError> {
    match outcome {
        LoadOutcome::Failed => Err(CliError::Load {
            what,
            message: list.error().unwrap_or_else(|| NETWORK_ERROR.to_string()),
        }),
        LoadOutcome::Applied | LoadOutcome::Skipped | LoadOutcome::Stale => Ok(()),
    }
}

fn parse_key<K: CatalogKey>(raw: &str, what: &str) -> Result<K, CliError> {
    K::from_key(raw).ok_or_else(|| {
        let known: Vec<&str> = K::all().iter().map(|k| k.as_key()).collect();
        CliError::Usage(format!("unknown {what} {raw:?}, expected one of {}", known.join(", ")))
    })
}

/// Submit the expense, then print the group with both lists reloaded.
///
/// Selecting the group empties its members and `add_expense` only refetches
/// expenses, so the members are fetched here before printing.
async fn add_expense<W: Write>(
    detail: &GroupDetailStore,
    args: AddExpenseArgs,
    out: &mut W,
    json: bool,
) -> Result<(), CliError> {
    let split = build_split(args.amount.as_deref(), &args.participants, &args.shares)?;
    let draft = ExpenseDraft {
        group_id: args.group_id,
        description: args.description,
        expense_type: parse_key::<ExpenseType>(&args.expense_type, "expense type")?,
        payer_id: args.payer,
    };

    detail.select_group(args.group_id);
    detail.add_expense(&draft, &split).await?;
    info!(group_id = args.group_id, "expense added");

    let members = detail.fetch_members().await;
    check(members, detail.members(), "members")?;
    if detail.expenses().error().is_some() {
        check(LoadOutcome::Failed, detail.expenses(), "expenses")?;
    }

    output::write_group_detail(
        out,
        args.group_id,
        &detail.members().items(),
        &detail.expenses().items(),
        json,
    )?;
    Ok(())
}

/// Fill a split the way the entry form would: typed values, then blur.
fn build_split(
    amount: Option<&str>,
    participants: &[i64],
    shares: &[(i64, String)],
) -> Result<ExpenseSplit, CliError> {
    let mut split = ExpenseSplit::new();

    if shares.is_empty() {
        let amount = amount.ok_or_else(|| {
            CliError::Usage("pass --amount with --participants, or one --share per member".into())
        })?;
        if participants.is_empty() {
            return Err(CliError::Usage("--participants is required with --amount".into()));
        }
        split.set_total_amount(amount).map_err(BuddyError::from)?;
        split.blur_total_amount();
        for &id in participants {
            if !split.is_selected(id) {
                split.toggle_participant(id);
            }
        }
    } else {
        split.set_method(SplitMethod::Unequal);
        for (id, value) in shares {
            split.set_participant_amount(*id, value).map_err(BuddyError::from)?;
            split.blur_participant_amount(*id);
        }
    }

    Ok(split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use buddy::{BuddyHttpClient, SplitError};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_build_equal_split() {
        let split = build_split(Some("10"), &[3, 1, 2, 1], &[]).unwrap();
        assert_eq!(split.total_amount(), "10.00");
        let shares = split.shares().unwrap();
        let amounts: Vec<_> = shares.iter().map(|s| (s.user_id, s.amount)).collect();
        assert_eq!(
            amounts,
            vec![(1, dec!(3.34)), (2, dec!(3.33)), (3, dec!(3.33))]
        );
    }

    #[test]
    fn test_build_unequal_split() {
        let shares = vec![(1, "7.5".to_string()), (2, "2.5".to_string())];
        let split = build_split(None, &[], &shares).unwrap();
        assert_eq!(split.method(), SplitMethod::Unequal);
        assert_eq!(split.total(), Some(dec!(10)));
        assert_eq!(split.participant_amount(1), Some("7.50"));
    }

    #[test]
    fn test_build_split_errors() {
        assert!(matches!(
            build_split(None, &[1], &[]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            build_split(Some("5"), &[], &[]),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            build_split(Some("1.234"), &[1], &[]),
            Err(CliError::Buddy(BuddyError::Split(SplitError::InvalidAmount(_))))
        ));
    }

    #[test]
    fn test_parse_key() {
        assert_eq!(parse_key::<Currency>("usd", "currency").unwrap(), Currency::Usd);
        assert!(matches!(
            parse_key::<GroupType>("castle", "group type"),
            Err(CliError::Usage(msg)) if msg.contains("HOME, TRIP, COUPLE, OTHER")
        ));
    }

    #[tokio::test]
    async fn test_add_expense_prints_members_and_expenses() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/expenses"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/expenses/group/4"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 11, "description": "Groceries", "amount": 30, "type": "FOOD" }
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/groups/4/members"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "Ana" },
                { "id": 2, "name": "Bea" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let detail = GroupDetailStore::new(BuddyHttpClient::new(&server.uri()), None);
        let args = AddExpenseArgs {
            group_id: 4,
            description: "Groceries".into(),
            amount: Some("30".into()),
            participants: vec![1, 2],
            shares: vec![],
            expense_type: "food".into(),
            payer: 1,
        };
        let mut out = Vec::new();
        add_expense(&detail, args, &mut out, false).await.unwrap();

        let printed = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = printed.lines().collect();
        assert_eq!(
            lines,
            vec![
                "member\t1\tAna\t-",
                "member\t2\tBea\t-",
                "expense\t11\tFOOD\t30.00\tGroceries\t-",
            ]
        );
    }
}
