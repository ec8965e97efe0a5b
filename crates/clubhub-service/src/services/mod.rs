//! Business logic services

pub mod auth;
pub mod clubs;

pub use auth::{AuthService, AuthenticatedSession};
pub use clubs::{ClubFilter, ClubService};
