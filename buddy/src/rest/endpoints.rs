use std::collections::HashMap;

use crate::error::Result;
use crate::rest::BuddyHttpClient;
use crate::types::*;

impl BuddyHttpClient {
    // --- Auth ---

    /// POST /auth/login - Exchange email and password for a session token.
    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        self.post("/auth/login", req).await
    }

    /// POST /auth/google - Exchange a Google OAuth token for a session token.
    pub async fn login_google(&self, req: &GoogleLoginRequest) -> Result<AuthResponse> {
        self.post("/auth/google", req).await
    }

    /// POST /auth/register - Create an account and return its session token.
    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        self.post("/auth/register", req).await
    }

    // --- Reference catalogs ---

    /// GET /common/group-types - Group type -> icon URL.
    pub async fn get_group_types(&self) -> Result<Catalog<GroupType>> {
        let raw: HashMap<String, String> = self.get("/common/group-types", &[]).await?;
        Ok(Catalog::from_raw(raw))
    }

    /// GET /common/currencies - Currency code -> symbol.
    pub async fn get_currencies(&self) -> Result<Catalog<Currency>> {
        let raw: HashMap<String, String> = self.get("/common/currencies", &[]).await?;
        Ok(Catalog::from_raw(raw))
    }

    /// GET /common/expense-types - Expense type -> icon URL.
    pub async fn get_expense_types(&self) -> Result<Catalog<ExpenseType>> {
        let raw: HashMap<String, String> = self.get("/common/expense-types", &[]).await?;
        Ok(Catalog::from_raw(raw))
    }

    // --- Groups ---

    /// GET /groups/detail?page=&size= - Groups with per-member balances.
    pub async fn get_groups(&self, page: u32, size: u32) -> Result<Page<Group>> {
        self.get(
            "/groups/detail",
            &[("page", &page.to_string()), ("size", &size.to_string())],
        )
        .await
    }

    /// POST /groups - Create a group.
    pub async fn create_group(&self, req: &CreateGroupRequest) -> Result<()> {
        self.post_unit("/groups", req).await
    }

    /// GET /groups/{id}/members - Members of a group.
    pub async fn get_group_members(&self, group_id: i64) -> Result<Vec<Member>> {
        self.get(&format!("/groups/{group_id}/members"), &[]).await
    }

    /// POST /groups/{id}/settle - Settle the balance with one member.
    pub async fn settle(&self, group_id: i64, req: &SettleRequest) -> Result<()> {
        self.post_unit(&format!("/groups/{group_id}/settle"), req)
            .await
    }

    // --- Expenses ---

    /// GET /expenses/group/{id} - Expenses of a group.
    pub async fn get_group_expenses(&self, group_id: i64) -> Result<Vec<ExpenseSimple>> {
        self.get(&format!("/expenses/group/{group_id}"), &[]).await
    }

    /// POST /expenses - Record an expense.
    pub async fn create_expense(&self, req: &CreateExpenseRequest) -> Result<()> {
        self.post_unit("/expenses", req).await
    }

    // --- Friends ---

    /// GET /friends?page=&size= - Friends with balances.
    pub async fn get_friends(&self, page: u32, size: u32) -> Result<Page<Friend>> {
        let page: FriendsPage<Friend> = self
            .get(
                "/friends",
                &[("page", &page.to_string()), ("size", &size.to_string())],
            )
            .await?;
        Ok(page.into())
    }

    /// POST /friends - Add a friend by email.
    pub async fn add_friend(&self, req: &AddFriendRequest) -> Result<()> {
        self.post_unit("/friends", req).await
    }

    // --- Activities ---

    /// GET /activities?page=&size= - Activity feed.
    pub async fn get_activities(&self, page: u32, size: u32) -> Result<Page<Activity>> {
        self.get(
            "/activities",
            &[("page", &page.to_string()), ("size", &size.to_string())],
        )
        .await
    }
}
