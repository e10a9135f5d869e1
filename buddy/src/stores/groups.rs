use rust_decimal::Decimal;
use tracing::info;

use crate::balance::summarize_group;
use crate::error::{BuddyError, Result};
use crate::paged::{ListSnapshot, LoadOutcome, PaginatedStore};
use crate::persist::{save_or_warn, SnapshotStore, GROUP_KEY};
use crate::rest::BuddyHttpClient;
use crate::types::{CreateGroupRequest, GroupSummary, Page, SettleRequest};

/// The current user's groups, summarised into ledger entries.
pub struct GroupStore {
    http: BuddyHttpClient,
    page_size: u32,
    snapshots: Option<SnapshotStore>,
    list: PaginatedStore<GroupSummary>,
}

impl GroupStore {
    /// Create the store, restoring the persisted snapshot if there is one.
    pub fn new(http: BuddyHttpClient, page_size: u32, snapshots: Option<SnapshotStore>) -> Self {
        let restored = snapshots
            .as_ref()
            .and_then(|s| s.load::<ListSnapshot<GroupSummary>>(GROUP_KEY))
            .unwrap_or_default();
        Self {
            http,
            page_size,
            snapshots,
            list: PaginatedStore::from_snapshot(restored),
        }
    }

    async fn fetch_page(&self, page: u32) -> Result<Page<GroupSummary>> {
        let page = self.http.get_groups(page, self.page_size).await?;
        page.try_map(|group| summarize_group(&group))
    }

    /// Replace the list with the first page.
    pub async fn fetch_groups(&self) -> LoadOutcome {
        let outcome = self
            .list
            .fetch_first_page(|page| self.fetch_page(page))
            .await;
        self.persist_if(outcome);
        outcome
    }

    /// Append the next page, unless one is already loading or none is left.
    pub async fn load_more(&self) -> LoadOutcome {
        let outcome = self.list.load_more(|page| self.fetch_page(page)).await;
        self.persist_if(outcome);
        outcome
    }

    /// Keep loading until the server reports the last page.
    pub async fn load_all(&self) -> LoadOutcome {
        let mut outcome = self.fetch_groups().await;
        while outcome == LoadOutcome::Applied && self.list.has_more() {
            outcome = self.load_more().await;
        }
        outcome
    }

    pub fn clear(&self) {
        self.list.clear();
        self.save_snapshot();
    }

    /// Create a group and refresh the list.
    pub async fn create_group(&self, req: &CreateGroupRequest) -> Result<()> {
        if req.name.trim().is_empty() {
            return Err(BuddyError::Validation("group name is required".into()));
        }
        self.http.create_group(req).await?;
        info!(name = %req.name, "group created");
        self.fetch_groups().await;
        Ok(())
    }

    /// Settle the balance with `counterparty` in `group_id`.
    ///
    /// Errors are returned to the caller rather than stored.
    pub async fn settle(&self, group_id: i64, counterparty: &str, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(BuddyError::Validation("settle amount must be positive".into()));
        }
        let req = SettleRequest {
            counterparty_name: counterparty.to_string(),
            amount,
        };
        self.http.settle(group_id, &req).await?;
        info!(group_id, counterparty, %amount, "debt settled");
        self.fetch_groups().await;
        Ok(())
    }

    pub fn groups(&self) -> Vec<GroupSummary> {
        self.list.items()
    }

    pub fn list(&self) -> &PaginatedStore<GroupSummary> {
        &self.list
    }

    pub fn save_snapshot(&self) {
        save_or_warn(self.snapshots.as_ref(), GROUP_KEY, &self.list.snapshot());
    }

    fn persist_if(&self, outcome: LoadOutcome) {
        if outcome == LoadOutcome::Applied {
            self.save_snapshot();
        }
    }
}
