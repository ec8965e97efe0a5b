//! Relationship resolution over the in-memory maps
//!
//! Builds the enriched views by looking up related records. Nothing here
//! writes to the store. Records whose references no longer resolve are
//! skipped instead of being returned half-built.

use super::MemStorage;
use clubhub_types::{
    Announcement, AnnouncementView, Club, ClubView, Membership, MembershipWithClub,
    MembershipWithUser, User,
};
use tracing::warn;

impl MemStorage {
    pub(super) fn member_count(&self, club_id: &str) -> usize {
        self.memberships
            .iter()
            .filter(|m| m.club_id == club_id)
            .count()
    }

    fn lookup_club(&self, id: &str) -> Option<Club> {
        self.clubs.get(id).map(|club| club.clone())
    }

    fn lookup_user(&self, id: &str) -> Option<User> {
        self.users.get(id).map(|user| user.clone())
    }

    pub(super) fn club_view(&self, club: Club, viewer: Option<&str>) -> ClubView {
        let member_count = self.member_count(&club.id);
        let leader = club
            .leader_id
            .as_deref()
            .and_then(|leader_id| self.lookup_user(leader_id));

        let (is_member, user_role) = match viewer {
            Some(viewer_id) => {
                let membership = self
                    .membership_id(viewer_id, &club.id)
                    .and_then(|id| self.memberships.get(&id).map(|m| m.role));
                (Some(membership.is_some()), membership)
            }
            None => (None, None),
        };

        ClubView {
            club,
            member_count,
            leader,
            is_member,
            user_role,
        }
    }

    pub(super) fn club_views(&self, mut clubs: Vec<Club>, viewer: Option<&str>) -> Vec<ClubView> {
        clubs.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        clubs
            .into_iter()
            .map(|club| self.club_view(club, viewer))
            .collect()
    }

    /// Attach each membership's club, dropping memberships of inactive clubs.
    pub(super) fn with_active_clubs(&self, memberships: Vec<Membership>) -> Vec<MembershipWithClub> {
        memberships
            .into_iter()
            .filter_map(|membership| match self.lookup_club(&membership.club_id) {
                Some(club) if club.is_active => Some(MembershipWithClub { membership, club }),
                Some(_) => None,
                None => {
                    warn!(
                        "Membership {} references missing club {}",
                        membership.id, membership.club_id
                    );
                    None
                }
            })
            .collect()
    }

    pub(super) fn with_users(&self, memberships: Vec<Membership>) -> Vec<MembershipWithUser> {
        memberships
            .into_iter()
            .filter_map(|membership| match self.lookup_user(&membership.user_id) {
                Some(user) => Some(MembershipWithUser { membership, user }),
                None => {
                    warn!(
                        "Membership {} references missing user {}",
                        membership.id, membership.user_id
                    );
                    None
                }
            })
            .collect()
    }

    /// Attach club and author, newest first.
    pub(super) fn announcement_views(&self, announcements: Vec<Announcement>) -> Vec<AnnouncementView> {
        let mut views: Vec<AnnouncementView> = announcements
            .into_iter()
            .filter_map(|announcement| {
                let club = match self.lookup_club(&announcement.club_id) {
                    Some(club) => club,
                    None => {
                        warn!(
                            "Announcement {} references missing club {}",
                            announcement.id, announcement.club_id
                        );
                        return None;
                    }
                };
                match self.lookup_user(&announcement.author_id) {
                    Some(author) => Some(AnnouncementView {
                        announcement,
                        club,
                        author,
                    }),
                    None => {
                        warn!(
                            "Announcement {} references missing author {}",
                            announcement.id, announcement.author_id
                        );
                        None
                    }
                }
            })
            .collect();

        views.sort_by(|a, b| b.announcement.created_at.cmp(&a.announcement.created_at));
        views
    }
}
