//! In-memory storage using DashMap
//!
//! Four maps keyed by generated id, plus secondary indexes for the unique
//! columns. Index slots are claimed through the entry API, so a uniqueness
//! check and its insert happen under the same shard lock.

mod clock;
mod query;
mod resolver;
pub mod session;

pub use session::MemorySessionStore;

use crate::{AnnouncementStore, ClubError, ClubStore, MembershipStore, Result, UserStore};
use async_trait::async_trait;
use clock::MonotonicClock;
use clubhub_types::{
    Announcement, AnnouncementUpdate, Club, ClubUpdate, Membership, MembershipRole,
    NewAnnouncement, NewClub, NewMembership, NewUser, User,
};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, info};
use uuid::Uuid;

/// Process-lifetime store for users, clubs, memberships and announcements
pub struct MemStorage {
    users: DashMap<String, User>,
    clubs: DashMap<String, Club>,
    memberships: DashMap<String, Membership>,
    announcements: DashMap<String, Announcement>,

    /// username -> user id
    usernames: DashMap<String, String>,
    /// email -> user id
    emails: DashMap<String, String>,
    /// (user id, club id) -> membership id
    membership_pairs: DashMap<(String, String), String>,

    clock: MonotonicClock,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            clubs: DashMap::new(),
            memberships: DashMap::new(),
            announcements: DashMap::new(),
            usernames: DashMap::new(),
            emails: DashMap::new(),
            membership_pairs: DashMap::new(),
            clock: MonotonicClock::new(),
        }
    }

    fn next_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn membership_id(&self, user_id: &str, club_id: &str) -> Option<String> {
        self.membership_pairs
            .get(&(user_id.to_string(), club_id.to_string()))
            .map(|id| id.value().clone())
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemStorage {
    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        let id = Self::next_id();

        match self.usernames.entry(new_user.username.clone()) {
            Entry::Occupied(_) => {
                return Err(ClubError::Conflict(format!(
                    "username already taken: {}",
                    new_user.username
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        match self.emails.entry(new_user.email.clone()) {
            Entry::Occupied(_) => {
                self.usernames.remove(&new_user.username);
                return Err(ClubError::Conflict(format!(
                    "email already registered: {}",
                    new_user.email
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let user = User {
            id: id.clone(),
            username: new_user.username,
            password: new_user.password,
            email: new_user.email,
            full_name: new_user.full_name,
            school_id: new_user.school_id,
            role: new_user.role.unwrap_or_default(),
            created_at: self.clock.now(),
        };
        self.users.insert(id, user.clone());

        info!("Created user: id={}, username={}, role={}", user.id, user.username, user.role);
        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.get(id).map(|user| user.clone()))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let id = match self.usernames.get(username) {
            Some(id) => id.value().clone(),
            None => return Ok(None),
        };
        self.get_user(&id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let id = match self.emails.get(email) {
            Some(id) => id.value().clone(),
            None => return Ok(None),
        };
        self.get_user(&id).await
    }
}

#[async_trait]
impl ClubStore for MemStorage {
    async fn create_club(&self, new_club: NewClub) -> Result<Club> {
        let club = Club {
            id: Self::next_id(),
            name: new_club.name,
            description: new_club.description,
            category: new_club.category,
            leader_id: new_club.leader_id,
            meeting_time: new_club.meeting_time,
            meeting_location: new_club.meeting_location,
            is_active: new_club.is_active.unwrap_or(true),
            created_at: self.clock.now(),
        };
        self.clubs.insert(club.id.clone(), club.clone());

        info!("Created club: id={}, name={}, category={}", club.id, club.name, club.category);
        Ok(club)
    }

    async fn create_club_with_leader(&self, mut new_club: NewClub, leader_id: &str) -> Result<Club> {
        new_club.leader_id = Some(leader_id.to_string());
        let club = self.create_club(new_club).await?;

        let membership =
            NewMembership::new(leader_id, club.id.clone()).with_role(MembershipRole::Leader);
        if let Err(e) = self.create_membership(membership).await {
            self.clubs.remove(&club.id);
            return Err(e);
        }

        Ok(club)
    }

    async fn get_club(&self, id: &str) -> Result<Option<Club>> {
        Ok(self.clubs.get(id).map(|club| club.clone()))
    }

    async fn update_club(&self, id: &str, update: ClubUpdate) -> Result<Option<Club>> {
        let current = match self.get_club(id).await? {
            Some(club) => club,
            None => return Ok(None),
        };

        let merged = update.merge(&current);
        self.clubs.insert(id.to_string(), merged.clone());

        debug!("Updated club {}", id);
        Ok(Some(merged))
    }

    async fn delete_club(&self, id: &str) -> Result<bool> {
        let deactivate = ClubUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        let deleted = self.update_club(id, deactivate).await?.is_some();
        if deleted {
            info!("Deactivated club {}", id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl MembershipStore for MemStorage {
    async fn create_membership(&self, new_membership: NewMembership) -> Result<Membership> {
        let id = Self::next_id();
        let pair = (new_membership.user_id.clone(), new_membership.club_id.clone());

        match self.membership_pairs.entry(pair) {
            Entry::Occupied(_) => {
                return Err(ClubError::Conflict(format!(
                    "user {} already belongs to club {}",
                    new_membership.user_id, new_membership.club_id
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(id.clone());
            }
        }

        let membership = Membership {
            id: id.clone(),
            user_id: new_membership.user_id,
            club_id: new_membership.club_id,
            role: new_membership.role.unwrap_or_default(),
            joined_at: self.clock.now(),
        };
        self.memberships.insert(id, membership.clone());

        info!(
            "Created membership: user={}, club={}, role={}",
            membership.user_id, membership.club_id, membership.role
        );
        Ok(membership)
    }

    async fn get_membership(&self, user_id: &str, club_id: &str) -> Result<Option<Membership>> {
        Ok(self
            .membership_id(user_id, club_id)
            .and_then(|id| self.memberships.get(&id).map(|m| m.clone())))
    }

    async fn update_membership_role(
        &self,
        user_id: &str,
        club_id: &str,
        role: MembershipRole,
    ) -> Result<Option<Membership>> {
        let id = match self.membership_id(user_id, club_id) {
            Some(id) => id,
            None => return Ok(None),
        };

        // In place: a re-insert could resurrect a row a concurrent delete removed.
        let updated = match self.memberships.get_mut(&id) {
            Some(mut slot) => {
                let updated = Membership {
                    role,
                    ..slot.clone()
                };
                *slot = updated.clone();
                updated
            }
            None => return Ok(None),
        };

        debug!("Membership role changed: user={}, club={}, role={}", user_id, club_id, role);
        Ok(Some(updated))
    }

    async fn delete_membership(&self, user_id: &str, club_id: &str) -> Result<bool> {
        let removed = self
            .membership_pairs
            .remove(&(user_id.to_string(), club_id.to_string()));

        match removed {
            Some((_, id)) => {
                self.memberships.remove(&id);
                info!("Deleted membership: user={}, club={}", user_id, club_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AnnouncementStore for MemStorage {
    async fn create_announcement(&self, new_announcement: NewAnnouncement) -> Result<Announcement> {
        let announcement = Announcement {
            id: Self::next_id(),
            title: new_announcement.title,
            content: new_announcement.content,
            club_id: new_announcement.club_id,
            author_id: new_announcement.author_id,
            created_at: self.clock.now(),
        };
        self.announcements
            .insert(announcement.id.clone(), announcement.clone());

        info!(
            "Created announcement: id={}, club={}, author={}",
            announcement.id, announcement.club_id, announcement.author_id
        );
        Ok(announcement)
    }

    async fn get_announcement(&self, id: &str) -> Result<Option<Announcement>> {
        Ok(self.announcements.get(id).map(|a| a.clone()))
    }

    async fn update_announcement(
        &self,
        id: &str,
        update: AnnouncementUpdate,
    ) -> Result<Option<Announcement>> {
        let current = match self.get_announcement(id).await? {
            Some(announcement) => announcement,
            None => return Ok(None),
        };

        let merged = update.merge(&current);
        self.announcements.insert(id.to_string(), merged.clone());

        debug!("Updated announcement {}", id);
        Ok(Some(merged))
    }

    async fn delete_announcement(&self, id: &str) -> Result<bool> {
        let deleted = self.announcements.remove(id).is_some();
        if deleted {
            info!("Deleted announcement {}", id);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use clubhub_types::{ClubCategory, UserRole};
    use std::collections::HashSet;
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    pub(crate) fn new_user(username: &str, role: Option<UserRole>) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: "hash".to_string(),
            email: format!("{}@school.test", username),
            full_name: username.to_uppercase(),
            school_id: format!("ID-{}", username),
            role,
        }
    }

    #[tokio::test]
    async fn test_user_ids_are_unique_and_stable() {
        let store = MemStorage::new();
        let mut ids = HashSet::new();

        for i in 0..50 {
            let user = assert_ok!(store.create_user(new_user(&format!("user{}", i), None)).await);
            assert!(ids.insert(user.id.clone()));

            let fetched = store.get_user(&user.id).await.unwrap().unwrap();
            assert_eq!(fetched, user);
        }
    }

    #[tokio::test]
    async fn test_user_defaults_to_student() {
        let store = MemStorage::new();
        let user = store.create_user(new_user("ajay", None)).await.unwrap();
        assert_eq!(user.role, UserRole::Student);

        let leader = store
            .create_user(new_user("sarah", Some(UserRole::Leader)))
            .await
            .unwrap();
        assert_eq!(leader.role, UserRole::Leader);
    }

    #[tokio::test]
    async fn test_duplicate_username_and_email_conflict() {
        let store = MemStorage::new();
        store.create_user(new_user("ajay", None)).await.unwrap();

        let err = assert_err!(store.create_user(new_user("ajay", None)).await);
        assert!(matches!(err, ClubError::Conflict(_)));

        let mut same_email = new_user("ajay2", None);
        same_email.email = "ajay@school.test".to_string();
        let err = assert_err!(store.create_user(same_email).await);
        assert!(matches!(err, ClubError::Conflict(_)));

        // The rejected registration must not keep its username reserved
        assert!(store.get_user_by_username("ajay2").await.unwrap().is_none());
        let mut retry = new_user("ajay2", None);
        retry.email = "ajay2@elsewhere.test".to_string();
        assert_ok!(store.create_user(retry).await);
    }

    #[tokio::test]
    async fn test_lookup_by_username_and_email() {
        let store = MemStorage::new();
        let user = store.create_user(new_user("shashi", None)).await.unwrap();

        let by_name = store.get_user_by_username("shashi").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
        let by_email = store
            .get_user_by_email("shashi@school.test")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);
        assert!(store.get_user_by_username("nobody").await.unwrap().is_none());
        assert!(store.get_user("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_club_defaults_and_soft_delete() {
        let store = MemStorage::new();
        let club = store
            .create_club(NewClub::new("Robotics", "Build robots", ClubCategory::Technology))
            .await
            .unwrap();
        assert!(club.is_active);
        assert_eq!(club.leader_id, None);

        assert!(store.delete_club(&club.id).await.unwrap());
        let stored = store.get_club(&club.id).await.unwrap().unwrap();
        assert!(!stored.is_active);

        assert!(!store.delete_club("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_update_club_returns_merged_record() {
        let store = MemStorage::new();
        let club = store
            .create_club(
                NewClub::new("Drama", "Plays", ClubCategory::Arts).meeting("Tue 4pm", "Theatre"),
            )
            .await
            .unwrap();

        let update = ClubUpdate {
            description: Some("Plays and musicals".to_string()),
            meeting_location: Some(None),
            ..Default::default()
        };
        let merged = store.update_club(&club.id, update).await.unwrap().unwrap();
        assert_eq!(merged.name, "Drama");
        assert_eq!(merged.description, "Plays and musicals");
        assert_eq!(merged.meeting_time.as_deref(), Some("Tue 4pm"));
        assert_eq!(merged.meeting_location, None);
        assert_eq!(store.get_club(&club.id).await.unwrap().unwrap(), merged);

        assert!(store
            .update_club("missing", ClubUpdate::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_create_club_with_leader_adds_leader_membership() {
        let store = MemStorage::new();
        let leader = store
            .create_user(new_user("mike", Some(UserRole::Leader)))
            .await
            .unwrap();
        let club = store
            .create_club_with_leader(
                NewClub::new("Debate", "Argue well", ClubCategory::Academic),
                &leader.id,
            )
            .await
            .unwrap();

        assert_eq!(club.leader_id.as_deref(), Some(leader.id.as_str()));
        let membership = store
            .get_membership(&leader.id, &club.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(membership.role, MembershipRole::Leader);
    }

    #[tokio::test]
    async fn test_membership_lifecycle() {
        let store = MemStorage::new();
        let membership = store
            .create_membership(NewMembership::new("u1", "c1"))
            .await
            .unwrap();
        assert_eq!(membership.role, MembershipRole::Member);

        let err = assert_err!(store.create_membership(NewMembership::new("u1", "c1")).await);
        assert!(matches!(err, ClubError::Conflict(_)));

        let updated = store
            .update_membership_role("u1", "c1", MembershipRole::Officer)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, membership.id);
        assert_eq!(updated.role, MembershipRole::Officer);
        assert_eq!(updated.joined_at, membership.joined_at);
        assert_eq!(
            store.get_membership("u1", "c1").await.unwrap().unwrap().role,
            MembershipRole::Officer
        );

        assert!(store.delete_membership("u1", "c1").await.unwrap());
        assert!(!store.delete_membership("u1", "c1").await.unwrap());
        assert!(store.get_membership("u1", "c1").await.unwrap().is_none());
        assert!(store
            .update_membership_role("u1", "c1", MembershipRole::Leader)
            .await
            .unwrap()
            .is_none());

        // Leaving frees the pair for a later re-join
        assert_ok!(store.create_membership(NewMembership::new("u1", "c1")).await);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_role_update_racing_delete_leaves_no_orphan_rows() {
        let store = Arc::new(MemStorage::new());

        for i in 0..200 {
            let club_id = format!("c{}", i);
            store
                .create_membership(NewMembership::new("u1", club_id.as_str()))
                .await
                .unwrap();

            let updater = {
                let store = store.clone();
                let club_id = club_id.clone();
                tokio::spawn(async move {
                    store
                        .update_membership_role("u1", &club_id, MembershipRole::Officer)
                        .await
                })
            };
            let deleter = {
                let store = store.clone();
                let club_id = club_id.clone();
                tokio::spawn(async move { store.delete_membership("u1", &club_id).await })
            };
            assert_ok!(updater.await.unwrap());
            assert!(deleter.await.unwrap().unwrap());

            assert!(store.get_membership("u1", &club_id).await.unwrap().is_none());
            assert_eq!(store.member_count(&club_id), 0);
        }
        assert!(store.memberships.is_empty());
        assert!(store.membership_pairs.is_empty());
    }

    #[tokio::test]
    async fn test_announcement_update_and_hard_delete() {
        let store = MemStorage::new();
        let announcement = store
            .create_announcement(NewAnnouncement {
                title: "Meeting".to_string(),
                content: "Room 12".to_string(),
                club_id: "c1".to_string(),
                author_id: "u1".to_string(),
            })
            .await
            .unwrap();

        let update = AnnouncementUpdate {
            content: Some("Room 14".to_string()),
            ..Default::default()
        };
        let merged = store
            .update_announcement(&announcement.id, update)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(merged.title, "Meeting");
        assert_eq!(merged.content, "Room 14");

        assert!(store.delete_announcement(&announcement.id).await.unwrap());
        assert!(store.get_announcement(&announcement.id).await.unwrap().is_none());
        assert!(!store.delete_announcement(&announcement.id).await.unwrap());
    }
}
