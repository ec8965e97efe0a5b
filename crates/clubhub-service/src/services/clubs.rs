//! Club service
//!
//! Everything the route layer does between authenticating a request and
//! answering it: existence checks, authorization, duplicate-join detection
//! and payload validation. Store absence becomes `ClubError::NotFound` here.

use crate::access::{self, Principal};
use clubhub_core::{
    AdminStats, Announcement, AnnouncementUpdate, AnnouncementView, Club, ClubCategory, ClubError,
    ClubUpdate, ClubView, Membership, MembershipRole, MembershipWithClub, MembershipWithUser,
    NewAnnouncement, NewClub, NewMembership, Result, Storage,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which clubs the directory shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClubFilter {
    All,
    Category(ClubCategory),
    Search(String),
}

impl ClubFilter {
    /// Search text wins over category; blank search text is ignored.
    pub fn from_query(category: Option<ClubCategory>, search: Option<String>) -> Self {
        match (search, category) {
            (Some(text), _) if !text.trim().is_empty() => ClubFilter::Search(text),
            (_, Some(category)) => ClubFilter::Category(category),
            _ => ClubFilter::All,
        }
    }
}

pub struct ClubService {
    storage: Arc<dyn Storage>,
}

impl ClubService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn directory(
        &self,
        filter: &ClubFilter,
        viewer: Option<&Principal>,
    ) -> Result<Vec<ClubView>> {
        let viewer_id = viewer.map(|p| p.user_id.as_str());
        match filter {
            ClubFilter::All => self.storage.list_active_clubs(viewer_id).await,
            ClubFilter::Category(category) => {
                self.storage
                    .list_clubs_by_category(*category, viewer_id)
                    .await
            }
            ClubFilter::Search(text) => self.storage.search_clubs(text, viewer_id).await,
        }
    }

    pub async fn club_detail(&self, club_id: &str, viewer: Option<&Principal>) -> Result<ClubView> {
        self.storage
            .get_club_view(club_id, viewer.map(|p| p.user_id.as_str()))
            .await?
            .ok_or_else(|| ClubError::not_found("Club", club_id))
    }

    /// Create a club led by the caller, who also becomes its leader member.
    pub async fn create_club(&self, principal: &Principal, new_club: NewClub) -> Result<Club> {
        if !access::can_create_club(principal) {
            warn!("User {} ({}) tried to create a club", principal.user_id, principal.role);
            return Err(ClubError::Forbidden(
                "Only leaders and admins can create clubs".to_string(),
            ));
        }
        require_text("name", &new_club.name)?;
        require_text("description", &new_club.description)?;

        let club = self
            .storage
            .create_club_with_leader(new_club, &principal.user_id)
            .await?;
        info!("User {} created club {} ({})", principal.user_id, club.name, club.id);
        Ok(club)
    }

    pub async fn update_club(
        &self,
        principal: &Principal,
        club_id: &str,
        update: ClubUpdate,
    ) -> Result<Club> {
        let club = self.require_club(club_id).await?;
        self.require_manager(principal, &club, "edit clubs").await?;
        if let Some(name) = &update.name {
            require_text("name", name)?;
        }
        if let Some(description) = &update.description {
            require_text("description", description)?;
        }

        self.storage
            .update_club(club_id, update)
            .await?
            .ok_or_else(|| ClubError::not_found("Club", club_id))
    }

    /// Soft-delete a club. Its memberships and announcements stay.
    pub async fn deactivate_club(&self, principal: &Principal, club_id: &str) -> Result<()> {
        let club = self.require_club(club_id).await?;
        self.require_manager(principal, &club, "delete clubs").await?;

        if !self.storage.delete_club(club_id).await? {
            return Err(ClubError::not_found("Club", club_id));
        }
        info!("User {} deactivated club {}", principal.user_id, club_id);
        Ok(())
    }

    /// Join as a plain member. Deactivated clubs are treated as absent and
    /// answer NotFound, the same as an unknown id.
    pub async fn join_club(&self, principal: &Principal, club_id: &str) -> Result<Membership> {
        let club = self.require_club(club_id).await?;
        if !club.is_active {
            return Err(ClubError::not_found("Club", club_id));
        }

        if self
            .storage
            .get_membership(&principal.user_id, club_id)
            .await?
            .is_some()
        {
            debug!("User {} is already in club {}", principal.user_id, club_id);
            return Err(ClubError::Conflict(
                "Already a member of this club".to_string(),
            ));
        }

        self.storage
            .create_membership(NewMembership::new(&principal.user_id, club_id))
            .await
    }

    pub async fn leave_club(&self, principal: &Principal, club_id: &str) -> Result<()> {
        if !self
            .storage
            .delete_membership(&principal.user_id, club_id)
            .await?
        {
            return Err(ClubError::not_found("Membership", club_id));
        }
        Ok(())
    }

    pub async fn club_members(
        &self,
        principal: &Principal,
        club_id: &str,
    ) -> Result<Vec<MembershipWithUser>> {
        let club = self.require_club(club_id).await?;
        self.require_manager(principal, &club, "view members").await?;
        self.storage.list_club_memberships(club_id).await
    }

    pub async fn set_member_role(
        &self,
        principal: &Principal,
        club_id: &str,
        user_id: &str,
        role: MembershipRole,
    ) -> Result<Membership> {
        let club = self.require_club(club_id).await?;
        self.require_manager(principal, &club, "change member roles").await?;

        let membership = self
            .storage
            .update_membership_role(user_id, club_id, role)
            .await?
            .ok_or_else(|| ClubError::not_found("Membership", format!("{}/{}", club_id, user_id)))?;
        info!(
            "User {} set role of {} in club {} to {}",
            principal.user_id, user_id, club_id, role
        );
        Ok(membership)
    }

    pub async fn my_memberships(&self, principal: &Principal) -> Result<Vec<MembershipWithClub>> {
        self.storage.list_user_memberships(&principal.user_id).await
    }

    pub async fn my_announcements(&self, principal: &Principal) -> Result<Vec<AnnouncementView>> {
        self.storage
            .list_user_announcements(&principal.user_id)
            .await
    }

    pub async fn club_announcements(&self, club_id: &str) -> Result<Vec<AnnouncementView>> {
        self.storage.list_club_announcements(club_id).await
    }

    pub async fn post_announcement(
        &self,
        principal: &Principal,
        club_id: &str,
        title: &str,
        content: &str,
    ) -> Result<Announcement> {
        let club = self.require_club(club_id).await?;
        self.require_manager(principal, &club, "create announcements")
            .await?;
        require_text("title", title)?;
        require_text("content", content)?;

        self.storage
            .create_announcement(NewAnnouncement {
                title: title.to_string(),
                content: content.to_string(),
                club_id: club_id.to_string(),
                author_id: principal.user_id.clone(),
            })
            .await
    }

    /// Club and author stay fixed after posting.
    pub async fn edit_announcement(
        &self,
        principal: &Principal,
        announcement_id: &str,
        update: AnnouncementUpdate,
    ) -> Result<Announcement> {
        let announcement = self.require_announcement(announcement_id).await?;
        let club = self.require_club(&announcement.club_id).await?;
        self.require_manager(principal, &club, "edit announcements")
            .await?;
        if let Some(title) = &update.title {
            require_text("title", title)?;
        }
        if let Some(content) = &update.content {
            require_text("content", content)?;
        }

        self.storage
            .update_announcement(announcement_id, update)
            .await?
            .ok_or_else(|| ClubError::not_found("Announcement", announcement_id))
    }

    pub async fn remove_announcement(
        &self,
        principal: &Principal,
        announcement_id: &str,
    ) -> Result<()> {
        let announcement = self.require_announcement(announcement_id).await?;
        let club = self.require_club(&announcement.club_id).await?;
        self.require_manager(principal, &club, "delete announcements")
            .await?;

        if !self.storage.delete_announcement(announcement_id).await? {
            return Err(ClubError::not_found("Announcement", announcement_id));
        }
        Ok(())
    }

    pub async fn admin_stats(&self, principal: &Principal) -> Result<AdminStats> {
        if !access::can_view_stats(principal) {
            return Err(ClubError::Forbidden("Admin access required".to_string()));
        }
        self.storage.admin_stats().await
    }

    async fn require_club(&self, club_id: &str) -> Result<Club> {
        self.storage
            .get_club(club_id)
            .await?
            .ok_or_else(|| ClubError::not_found("Club", club_id))
    }

    async fn require_announcement(&self, announcement_id: &str) -> Result<Announcement> {
        self.storage
            .get_announcement(announcement_id)
            .await?
            .ok_or_else(|| ClubError::not_found("Announcement", announcement_id))
    }

    async fn require_manager(&self, principal: &Principal, club: &Club, action: &str) -> Result<()> {
        let membership = self
            .storage
            .get_membership(&principal.user_id, &club.id)
            .await?;
        if access::can_manage_club(principal, club, membership.as_ref()) {
            return Ok(());
        }

        warn!(
            "User {} denied: {} on club {}",
            principal.user_id, action, club.id
        );
        Err(ClubError::Forbidden(format!(
            "Only club leaders and admins can {}",
            action
        )))
    }
}

fn require_text(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClubError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
