use crate::paged::{ListSnapshot, LoadOutcome, PaginatedStore};
use crate::persist::{save_or_warn, SnapshotStore, ACTIVITY_KEY};
use crate::rest::BuddyHttpClient;
use crate::types::Activity;

pub struct ActivityStore {
    http: BuddyHttpClient,
    page_size: u32,
    snapshots: Option<SnapshotStore>,
    list: PaginatedStore<Activity>,
}

impl ActivityStore {
    pub fn new(http: BuddyHttpClient, page_size: u32, snapshots: Option<SnapshotStore>) -> Self {
        let restored = snapshots
            .as_ref()
            .and_then(|s| s.load::<ListSnapshot<Activity>>(ACTIVITY_KEY))
            .unwrap_or_default();
        Self {
            http,
            page_size,
            snapshots,
            list: PaginatedStore::from_snapshot(restored),
        }
    }

    pub async fn fetch_activities(&self) -> LoadOutcome {
        let outcome = self
            .list
            .fetch_first_page(|page| self.http.get_activities(page, self.page_size))
            .await;
        if outcome == LoadOutcome::Applied {
            self.save_snapshot();
        }
        outcome
    }

    pub async fn load_more(&self) -> LoadOutcome {
        let outcome = self
            .list
            .load_more(|page| self.http.get_activities(page, self.page_size))
            .await;
        if outcome == LoadOutcome::Applied {
            self.save_snapshot();
        }
        outcome
    }

    pub async fn load_all(&self) -> LoadOutcome {
        let mut outcome = self.fetch_activities().await;
        while outcome == LoadOutcome::Applied && self.list.has_more() {
            outcome = self.load_more().await;
        }
        outcome
    }

    pub fn clear(&self) {
        self.list.clear();
        self.save_snapshot();
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.list.items()
    }

    pub fn list(&self) -> &PaginatedStore<Activity> {
        &self.list
    }

    pub fn save_snapshot(&self) {
        save_or_warn(self.snapshots.as_ref(), ACTIVITY_KEY, &self.list.snapshot());
    }
}
