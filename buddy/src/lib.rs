pub mod balance;
pub mod client;
pub mod config;
pub mod error;
pub mod paged;
pub mod persist;
pub mod rest;
pub mod split;
pub mod stores;
pub mod token;
pub mod types;

// ---- Top-level re-exports for ergonomic usage ----

// Client + config
pub use client::Buddy;
pub use config::BuddyConfig;
pub use error::{BuddyError, Result, NETWORK_ERROR};

// REST client
pub use rest::BuddyHttpClient;

// Stores
pub use paged::{ListSnapshot, LoadOutcome, PagedList, PaginatedStore};
pub use stores::{ActivityStore, FriendStore, GroupDetailStore, GroupStore, Session, SessionStore};

// Balance transform + split calculator
pub use balance::{Direction, LedgerEntry};
pub use split::{ExpenseSplit, SplitError, SplitMethod};

// Persistence
pub use persist::SnapshotStore;

// Catalogs
pub use types::{Catalog, CatalogKey, Currency, ExpenseType, GroupType};

// Wire types
pub use types::{
    Activity, ExpenseDraft, ExpenseShare, ExpenseSimple, Friend, FriendSummary, Group,
    GroupSummary, Member, OrderedAmounts, Page,
};
