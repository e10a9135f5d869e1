use tracing::info;

use crate::balance::summarize_friend;
use crate::error::{BuddyError, Result};
use crate::paged::{ListSnapshot, LoadOutcome, PaginatedStore};
use crate::persist::{save_or_warn, SnapshotStore, FRIEND_KEY};
use crate::rest::BuddyHttpClient;
use crate::types::{AddFriendRequest, FriendSummary, Page};

pub struct FriendStore {
    http: BuddyHttpClient,
    page_size: u32,
    snapshots: Option<SnapshotStore>,
    list: PaginatedStore<FriendSummary>,
}

impl FriendStore {
    pub fn new(http: BuddyHttpClient, page_size: u32, snapshots: Option<SnapshotStore>) -> Self {
        let restored = snapshots
            .as_ref()
            .and_then(|s| s.load::<ListSnapshot<FriendSummary>>(FRIEND_KEY))
            .unwrap_or_default();
        Self {
            http,
            page_size,
            snapshots,
            list: PaginatedStore::from_snapshot(restored),
        }
    }

    async fn fetch_page(&self, page: u32) -> Result<Page<FriendSummary>> {
        let page = self.http.get_friends(page, self.page_size).await?;
        page.try_map(|friend| summarize_friend(&friend))
    }

    pub async fn fetch_friends(&self) -> LoadOutcome {
        let outcome = self
            .list
            .fetch_first_page(|page| self.fetch_page(page))
            .await;
        if outcome == LoadOutcome::Applied {
            self.save_snapshot();
        }
        outcome
    }

    pub async fn load_more(&self) -> LoadOutcome {
        let outcome = self.list.load_more(|page| self.fetch_page(page)).await;
        if outcome == LoadOutcome::Applied {
            self.save_snapshot();
        }
        outcome
    }

    pub async fn load_all(&self) -> LoadOutcome {
        let mut outcome = self.fetch_friends().await;
        while outcome == LoadOutcome::Applied && self.list.has_more() {
            outcome = self.load_more().await;
        }
        outcome
    }

    pub fn clear(&self) {
        self.list.clear();
        self.save_snapshot();
    }

    /// Send a friend request by email and refresh the list.
    pub async fn add_friend(&self, email: &str) -> Result<()> {
        let email = email.trim();
        if !email.contains('@') {
            return Err(BuddyError::Validation(format!("{email:?} is not an email address")));
        }
        self.http
            .add_friend(&AddFriendRequest {
                email: email.to_string(),
            })
            .await?;
        info!(email, "friend added");
        self.fetch_friends().await;
        Ok(())
    }

    pub fn friends(&self) -> Vec<FriendSummary> {
        self.list.items()
    }

    pub fn list(&self) -> &PaginatedStore<FriendSummary> {
        &self.list
    }

    pub fn save_snapshot(&self) {
        save_or_warn(self.snapshots.as_ref(), FRIEND_KEY, &self.list.snapshot());
    }
}
