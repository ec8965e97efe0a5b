//! Port traits (interfaces) for dependency injection

pub mod session;
pub mod storage;

pub use session::{Session, SessionStore};
pub use storage::{
    AnnouncementStore, ClubQueries, ClubStore, MembershipStore, Storage, UserStore,
};
