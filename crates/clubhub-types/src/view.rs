//! Enriched read models
//!
//! Each view wraps a stored entity and adds fields resolved from related
//! records. The entity is flattened so the JSON shape is the entity's own
//! fields plus the extras.

use crate::{Announcement, Club, Membership, MembershipRole, User};
use serde::{Deserialize, Serialize};

/// Club with member count, leader and the viewer's membership status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubView {
    #[serde(flatten)]
    pub club: Club,
    pub member_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leader: Option<User>,
    /// Only set when the view was built for a viewer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_member: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_role: Option<MembershipRole>,
}

/// Membership with its club, as listed for the member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipWithClub {
    #[serde(flatten)]
    pub membership: Membership,
    pub club: Club,
}

/// Membership with its user, as listed for a club
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipWithUser {
    #[serde(flatten)]
    pub membership: Membership,
    pub user: User,
}

/// Announcement with its club and author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementView {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub club: Club,
    pub author: User,
}

/// Aggregate counts for the admin dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_students: usize,
    pub total_leaders: usize,
    pub active_clubs: usize,
    pub total_memberships: usize,
}
