//! Clubhub Core Library
//!
//! Error taxonomy, storage port traits, and the in-memory storage and
//! session implementations for the Clubhub system.

// Re-export pure types from clubhub-types
pub use clubhub_types::*;

pub mod error;
pub mod memory;
pub mod ports;

pub use error::{ClubError, Result};
pub use memory::{MemStorage, MemorySessionStore};
pub use ports::{
    AnnouncementStore, ClubQueries, ClubStore, MembershipStore, Session, SessionStore, Storage,
    UserStore,
};
