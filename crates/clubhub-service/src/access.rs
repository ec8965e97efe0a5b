//! Authorization policy
//!
//! Pure checks over the authenticated principal and the records involved.
//! The store never enforces these; the services call them before touching it.

use clubhub_core::{Club, Membership, MembershipRole, User, UserRole};

/// The authenticated caller of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub role: UserRole,
}

impl Principal {
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Principal::new(user.id.clone(), user.role)
    }
}

/// Only leaders and admins may found clubs.
pub fn can_create_club(principal: &Principal) -> bool {
    matches!(principal.role, UserRole::Leader | UserRole::Admin)
}

/// Editing a club, posting to it, and reading its member list.
///
/// `membership` is the principal's own membership in `club`, if any.
pub fn can_manage_club(principal: &Principal, club: &Club, membership: Option<&Membership>) -> bool {
    principal.is_admin()
        || club.leader_id.as_deref() == Some(principal.user_id.as_str())
        || membership.map(|m| m.role) == Some(MembershipRole::Leader)
}

pub fn can_view_stats(principal: &Principal) -> bool {
    principal.is_admin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use clubhub_core::ClubCategory;

    fn club(leader_id: Option<&str>) -> Club {
        Club {
            id: "c1".to_string(),
            name: "Chess Club".to_string(),
            description: "Strategy".to_string(),
            category: ClubCategory::Academic,
            leader_id: leader_id.map(str::to_string),
            meeting_time: None,
            meeting_location: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn membership(user_id: &str, role: MembershipRole) -> Membership {
        Membership {
            id: "m1".to_string(),
            user_id: user_id.to_string(),
            club_id: "c1".to_string(),
            role,
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_club_requires_leader_or_admin() {
        assert!(!can_create_club(&Principal::new("u1", UserRole::Student)));
        assert!(can_create_club(&Principal::new("u1", UserRole::Leader)));
        assert!(can_create_club(&Principal::new("u1", UserRole::Admin)));
    }

    #[test]
    fn test_manage_club_paths() {
        let club = club(Some("leader"));

        let admin = Principal::new("root", UserRole::Admin);
        assert!(can_manage_club(&admin, &club, None));

        let leader = Principal::new("leader", UserRole::Leader);
        assert!(can_manage_club(&leader, &club, None));

        let co_leader = Principal::new("co", UserRole::Student);
        let co_membership = membership("co", MembershipRole::Leader);
        assert!(can_manage_club(&co_leader, &club, Some(&co_membership)));

        let officer = Principal::new("officer", UserRole::Leader);
        let officer_membership = membership("officer", MembershipRole::Officer);
        assert!(!can_manage_club(&officer, &club, Some(&officer_membership)));

        let stranger = Principal::new("stranger", UserRole::Leader);
        assert!(!can_manage_club(&stranger, &club, None));
    }

    #[test]
    fn test_clubs_without_leader_are_admin_only() {
        let club = club(None);
        assert!(!can_manage_club(&Principal::new("u1", UserRole::Leader), &club, None));
        assert!(can_manage_club(&Principal::new("u1", UserRole::Admin), &club, None));
    }

    #[test]
    fn test_stats_admin_only() {
        assert!(can_view_stats(&Principal::new("u1", UserRole::Admin)));
        assert!(!can_view_stats(&Principal::new("u1", UserRole::Leader)));
    }
}
