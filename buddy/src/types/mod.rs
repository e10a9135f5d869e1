mod activity;
mod amounts;
mod catalog;
mod expense;
mod friend;
mod group;
mod page;
mod user;

pub use activity::*;
pub use amounts::*;
pub use catalog::*;
pub use expense::*;
pub use friend::*;
pub use group::*;
pub use page::*;
pub use user::*;
