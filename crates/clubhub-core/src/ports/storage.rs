//! Storage traits for persistence
//!
//! Lookups report absence as `Ok(None)` (or `Ok(false)` for deletes);
//! errors are reserved for conflicts and backend failures.

use crate::Result;
use async_trait::async_trait;
use clubhub_types::{
    AdminStats, Announcement, AnnouncementUpdate, AnnouncementView, Club, ClubCategory, ClubUpdate,
    ClubView, Membership, MembershipRole, MembershipWithClub, MembershipWithUser, NewAnnouncement,
    NewClub, NewMembership, NewUser, User,
};

/// User store
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `Conflict` when the username or email is already taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn get_user(&self, id: &str) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Club store
#[async_trait]
pub trait ClubStore: Send + Sync {
    async fn create_club(&self, club: NewClub) -> Result<Club>;
    /// Create the club and a `leader` membership for `leader_id` as one unit.
    async fn create_club_with_leader(&self, club: NewClub, leader_id: &str) -> Result<Club>;
    async fn get_club(&self, id: &str) -> Result<Option<Club>>;
    async fn update_club(&self, id: &str, update: ClubUpdate) -> Result<Option<Club>>;
    /// Soft delete: marks the club inactive.
    async fn delete_club(&self, id: &str) -> Result<bool>;
}

/// Membership store
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// Fails with `Conflict` when the user already belongs to the club.
    async fn create_membership(&self, membership: NewMembership) -> Result<Membership>;
    async fn get_membership(&self, user_id: &str, club_id: &str) -> Result<Option<Membership>>;
    async fn update_membership_role(
        &self,
        user_id: &str,
        club_id: &str,
        role: MembershipRole,
    ) -> Result<Option<Membership>>;
    async fn delete_membership(&self, user_id: &str, club_id: &str) -> Result<bool>;
}

/// Announcement store
#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    async fn create_announcement(&self, announcement: NewAnnouncement) -> Result<Announcement>;
    async fn get_announcement(&self, id: &str) -> Result<Option<Announcement>>;
    async fn update_announcement(
        &self,
        id: &str,
        update: AnnouncementUpdate,
    ) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, id: &str) -> Result<bool>;
}

/// Enriched read queries
///
/// `viewer` fills in `is_member` / `user_role` on club views.
#[async_trait]
pub trait ClubQueries: Send + Sync {
    async fn list_active_clubs(&self, viewer: Option<&str>) -> Result<Vec<ClubView>>;
    async fn list_clubs_by_category(
        &self,
        category: ClubCategory,
        viewer: Option<&str>,
    ) -> Result<Vec<ClubView>>;
    async fn search_clubs(&self, text: &str, viewer: Option<&str>) -> Result<Vec<ClubView>>;
    async fn get_club_view(&self, id: &str, viewer: Option<&str>) -> Result<Option<ClubView>>;
    /// Memberships of the user in active clubs only.
    async fn list_user_memberships(&self, user_id: &str) -> Result<Vec<MembershipWithClub>>;
    async fn list_club_memberships(&self, club_id: &str) -> Result<Vec<MembershipWithUser>>;
    /// Newest first.
    async fn list_club_announcements(&self, club_id: &str) -> Result<Vec<AnnouncementView>>;
    /// Announcements of every active club the user belongs to, newest first.
    async fn list_user_announcements(&self, user_id: &str) -> Result<Vec<AnnouncementView>>;
    async fn admin_stats(&self) -> Result<AdminStats>;
}

/// Everything the service layer needs from a backend
pub trait Storage: UserStore + ClubStore + MembershipStore + AnnouncementStore + ClubQueries {}

impl<T> Storage for T where
    T: UserStore + ClubStore + MembershipStore + AnnouncementStore + ClubQueries
{
}
