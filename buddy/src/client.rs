use chrono::Utc;
use tracing::debug;

use crate::config::BuddyConfig;
use crate::error::Result;
use crate::persist::SnapshotStore;
use crate::rest::BuddyHttpClient;
use crate::stores::*;

/// Every store of the application, wired to one HTTP client.
///
/// Stores are plain fields constructed here and passed by reference to
/// whoever needs them; there is no global instance. Each store restores its
/// persisted snapshot on construction.
pub struct Buddy {
    pub config: BuddyConfig,
    pub http: BuddyHttpClient,
    pub session: SessionStore,
    pub groups: GroupStore,
    pub friends: FriendStore,
    pub activities: ActivityStore,
    pub group_detail: GroupDetailStore,
}

impl Buddy {
    pub fn new(config: BuddyConfig) -> Self {
        let http = BuddyHttpClient::new(&config.api_base_url);
        let snapshots = config.storage_dir.clone().map(SnapshotStore::new);
        debug!(
            api = %config.api_base_url,
            storage = ?config.storage_dir,
            "initialising stores"
        );

        Self {
            session: SessionStore::new(http.clone(), &config.avatar_placeholder, snapshots.clone()),
            groups: GroupStore::new(http.clone(), config.page_size, snapshots.clone()),
            friends: FriendStore::new(http.clone(), config.page_size, snapshots.clone()),
            activities: ActivityStore::new(http.clone(), config.page_size, snapshots.clone()),
            group_detail: GroupDetailStore::new(http.clone(), snapshots),
            http,
            config,
        }
    }

    /// Check the session against the current time, logging out everything
    /// if it has expired.
    pub fn require_active(&self) -> Result<()> {
        let result = self.session.require_active(Utc::now());
        if result.is_err() {
            self.clear_lists();
        }
        result
    }

    /// Sign out and drop every cached list.
    pub fn logout(&self) {
        self.session.logout();
        self.clear_lists();
    }

    fn clear_lists(&self) {
        self.groups.clear();
        self.friends.clear();
        self.activities.clear();
        self.group_detail.clear();
    }
}
