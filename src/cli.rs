use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

/// billbuddy: split shared expenses with groups and friends.
#[derive(Parser, Debug)]
#[command(name = "billbuddy", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Output as JSON lines instead of TSV
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with email and password
    Login(LoginArgs),

    /// Sign in with a Google OAuth token
    LoginGoogle(GoogleArgs),

    /// Create an account and sign in
    Register(RegisterArgs),

    /// Sign out and forget all cached data
    Logout,

    /// Show the signed-in user
    Whoami,

    /// List your groups with balances
    Groups(ListArgs),

    /// List your friends with balances
    Friends(ListArgs),

    /// Show recent activity
    Activities(ListArgs),

    /// Show members and expenses of a group
    Group(GroupArgs),

    /// Create a new group
    CreateGroup(CreateGroupArgs),

    /// Add a friend by email
    AddFriend(AddFriendArgs),

    /// Add an expense to a group
    AddExpense(AddExpenseArgs),

    /// Settle up with someone in a group
    Settle(SettleArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    pub email: String,

    #[arg(long)]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct GoogleArgs {
    /// OAuth token obtained from Google sign-in
    pub token: String,
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    pub email: String,

    #[arg(long)]
    pub password: String,

    #[arg(long)]
    pub given_name: String,

    #[arg(long)]
    pub family_name: String,
}

/// Arguments shared by the paginated listings.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Fetch every page instead of only the first
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct GroupArgs {
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct CreateGroupArgs {
    pub name: String,

    /// Group type key (HOME, TRIP, COUPLE, OTHER)
    #[arg(long = "type", default_value = "OTHER")]
    pub group_type: String,

    /// Currency key (AUD, USD, EUR, ...)
    #[arg(long, default_value = "AUD")]
    pub currency: String,
}

#[derive(Args, Debug)]
pub struct AddFriendArgs {
    pub email: String,
}

/// Split equally with `--amount` and `--participants`, or unequally with
/// one `--share id=amount` per participant.
#[derive(Args, Debug)]
pub struct AddExpenseArgs {
    pub group_id: i64,

    pub description: String,

    /// Total amount, split equally between the participants
    #[arg(long, conflicts_with = "shares")]
    pub amount: Option<String>,

    /// Member ids sharing the expense equally
    #[arg(long, value_delimiter = ',', requires = "amount")]
    pub participants: Vec<i64>,

    /// Unequal share as `member_id=amount`; repeat per participant
    #[arg(long = "share", value_parser = parse_share)]
    pub shares: Vec<(i64, String)>,

    /// Expense type key (FOOD, TRANSPORT, ...)
    #[arg(long = "type", default_value = "OTHER")]
    pub expense_type: String,

    /// Member id of whoever paid
    #[arg(long)]
    pub payer: i64,
}

#[derive(Args, Debug)]
pub struct SettleArgs {
    pub group_id: i64,

    /// Name of the member you are settling with
    pub counterparty: String,

    pub amount: Decimal,
}

/// Parse `id=amount`.
fn parse_share(raw: &str) -> Result<(i64, String), String> {
    let (id, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected member_id=amount, got {raw:?}"))?;
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid member id {id:?}: {e}"))?;
    Ok((id, amount.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_share() {
        assert_eq!(parse_share("3=12.5"), Ok((3, "12.5".to_string())));
        assert_eq!(parse_share(" 4 = 1 "), Ok((4, "1".to_string())));
        assert!(parse_share("12.5").is_err());
        assert!(parse_share("ana=1").is_err());
    }

    #[test]
    fn test_add_expense_equal_args() {
        let cli = Cli::parse_from([
            "billbuddy",
            "add-expense",
            "7",
            "Dinner",
            "--amount",
            "30",
            "--participants",
            "1,2,3",
            "--payer",
            "1",
            "--type",
            "food",
        ]);
        let Command::AddExpense(args) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.participants, vec![1, 2, 3]);
        assert_eq!(args.amount.as_deref(), Some("30"));
        assert!(args.shares.is_empty());
    }

    #[test]
    fn test_add_expense_rejects_amount_with_shares() {
        let result = Cli::try_parse_from([
            "billbuddy",
            "add-expense",
            "7",
            "Dinner",
            "--amount",
            "30",
            "--share",
            "1=30",
            "--payer",
            "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_json_flag_after_subcommand() {
        let cli = Cli::parse_from(["billbuddy", "groups", "--all", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Command::Groups(ListArgs { all: true })));
    }
}
