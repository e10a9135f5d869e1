use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BuddyError, Result};
use crate::paged::{ListSnapshot, LoadOutcome, PaginatedStore};
use crate::persist::{save_or_warn, SnapshotStore, GROUP_DETAIL_KEY};
use crate::rest::BuddyHttpClient;
use crate::split::{ExpenseSplit, SplitMethod};
use crate::types::{CreateExpenseRequest, ExpenseDraft, ExpenseSimple, Member, Page};

/// Persisted part of [`GroupDetailStore`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetailSnapshot {
    pub selected_group_id: Option<i64>,
    pub members: ListSnapshot<Member>,
    pub expenses: ListSnapshot<ExpenseSimple>,
}

/// Members and expenses of the selected group.
///
/// The selection is an id only. Selecting a different group resets both
/// sub-lists, and responses for the previous group are discarded.
pub struct GroupDetailStore {
    http: BuddyHttpClient,
    snapshots: Option<SnapshotStore>,
    selected: Mutex<Option<i64>>,
    members: PaginatedStore<Member>,
    expenses: PaginatedStore<ExpenseSimple>,
}

impl GroupDetailStore {
    pub fn new(http: BuddyHttpClient, snapshots: Option<SnapshotStore>) -> Self {
        let restored: GroupDetailSnapshot = snapshots
            .as_ref()
            .and_then(|s| s.load(GROUP_DETAIL_KEY))
            .unwrap_or_default();
        Self {
            http,
            snapshots,
            selected: Mutex::new(restored.selected_group_id),
            members: PaginatedStore::from_snapshot(restored.members),
            expenses: PaginatedStore::from_snapshot(restored.expenses),
        }
    }

    pub fn selected_group(&self) -> Option<i64> {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make `group_id` the active group, resetting the sub-lists if it changed.
    pub fn select_group(&self, group_id: i64) {
        {
            let mut selected = self.selected.lock().unwrap_or_else(PoisonError::into_inner);
            if *selected == Some(group_id) {
                return;
            }
            debug!(from = ?*selected, to = group_id, "switching group");
            *selected = Some(group_id);
        }
        self.members.clear();
        self.expenses.clear();
        self.save_snapshot();
    }

    /// Drop the selection and both sub-lists.
    pub fn clear(&self) {
        *self.selected.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.members.clear();
        self.expenses.clear();
        self.save_snapshot();
    }

    pub async fn fetch_members(&self) -> LoadOutcome {
        let Some(group_id) = self.selected_group() else {
            return LoadOutcome::Skipped;
        };
        let outcome = self
            .members
            .fetch_first_page(|_| async move {
                self.http
                    .get_group_members(group_id)
                    .await
                    .map(Page::single)
            })
            .await;
        if outcome == LoadOutcome::Applied {
            self.save_snapshot();
        }
        outcome
    }

    pub async fn fetch_expenses(&self) -> LoadOutcome {
        let Some(group_id) = self.selected_group() else {
            return LoadOutcome::Skipped;
        };
        let outcome = self
            .expenses
            .fetch_first_page(|_| async move {
                self.http
                    .get_group_expenses(group_id)
                    .await
                    .map(Page::single)
            })
            .await;
        if outcome == LoadOutcome::Applied {
            self.save_snapshot();
        }
        outcome
    }

    /// Fetch members and expenses concurrently.
    pub async fn refresh(&self) -> (LoadOutcome, LoadOutcome) {
        futures_util::future::join(self.fetch_members(), self.fetch_expenses()).await
    }

    /// Submit an expense built from `draft` and a valid `split`, then refresh
    /// the expense list if the expense belongs to the selected group.
    ///
    /// An incomplete split is rejected locally without a request.
    pub async fn add_expense(&self, draft: &ExpenseDraft, split: &ExpenseSplit) -> Result<()> {
        if draft.description.trim().is_empty() {
            return Err(BuddyError::Validation("description is required".into()));
        }
        let shares = split.shares()?;
        let amount = split.total().unwrap_or_default();

        let req = CreateExpenseRequest {
            group_id: draft.group_id,
            description: draft.description.trim().to_string(),
            expense_type: draft.expense_type,
            payer_id: draft.payer_id,
            amount,
            equal: split.method() == SplitMethod::Equal,
            shares,
        };
        self.http.create_expense(&req).await?;
        info!(group_id = draft.group_id, %amount, "expense created");

        if self.selected_group() == Some(draft.group_id) {
            self.fetch_expenses().await;
        }
        Ok(())
    }

    pub fn members(&self) -> &PaginatedStore<Member> {
        &self.members
    }

    pub fn expenses(&self) -> &PaginatedStore<ExpenseSimple> {
        &self.expenses
    }

    pub fn snapshot(&self) -> GroupDetailSnapshot {
        GroupDetailSnapshot {
            selected_group_id: self.selected_group(),
            members: self.members.snapshot(),
            expenses: self.expenses.snapshot(),
        }
    }

    pub fn save_snapshot(&self) {
        save_or_warn(self.snapshots.as_ref(), GROUP_DETAIL_KEY, &self.snapshot());
    }
}
