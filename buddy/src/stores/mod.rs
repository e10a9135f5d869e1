mod activities;
mod friends;
mod group_detail;
mod groups;
mod session;

pub use activities::ActivityStore;
pub use friends::FriendStore;
pub use group_detail::{GroupDetailSnapshot, GroupDetailStore};
pub use groups::GroupStore;
pub use session::{Session, SessionStore};
