//! Query surface over the in-memory store

use super::MemStorage;
use crate::{ClubQueries, Result};
use async_trait::async_trait;
use clubhub_types::{
    AdminStats, Announcement, AnnouncementView, Club, ClubCategory, ClubView, Membership,
    MembershipWithClub, MembershipWithUser, UserRole,
};
use std::collections::HashSet;
use tracing::debug;

impl MemStorage {
    fn active_clubs_where(&self, predicate: impl Fn(&Club) -> bool) -> Vec<Club> {
        self.clubs
            .iter()
            .filter(|club| club.is_active && predicate(club.value()))
            .map(|club| club.clone())
            .collect()
    }

    fn memberships_where(&self, predicate: impl Fn(&Membership) -> bool) -> Vec<Membership> {
        let mut memberships: Vec<Membership> = self
            .memberships
            .iter()
            .filter(|m| predicate(m.value()))
            .map(|m| m.clone())
            .collect();
        memberships.sort_by(|a, b| a.joined_at.cmp(&b.joined_at));
        memberships
    }

    fn announcements_where(&self, predicate: impl Fn(&Announcement) -> bool) -> Vec<Announcement> {
        self.announcements
            .iter()
            .filter(|a| predicate(a.value()))
            .map(|a| a.clone())
            .collect()
    }
}

#[async_trait]
impl ClubQueries for MemStorage {
    async fn list_active_clubs(&self, viewer: Option<&str>) -> Result<Vec<ClubView>> {
        let clubs = self.active_clubs_where(|_| true);
        debug!("Listing {} active clubs", clubs.len());
        Ok(self.club_views(clubs, viewer))
    }

    async fn list_clubs_by_category(
        &self,
        category: ClubCategory,
        viewer: Option<&str>,
    ) -> Result<Vec<ClubView>> {
        let clubs = self.active_clubs_where(|club| club.category == category);
        debug!("Listing {} clubs in category {}", clubs.len(), category);
        Ok(self.club_views(clubs, viewer))
    }

    async fn search_clubs(&self, text: &str, viewer: Option<&str>) -> Result<Vec<ClubView>> {
        let needle = text.to_lowercase();
        let clubs = self.active_clubs_where(|club| club.matches(&needle));
        debug!("Search {:?} matched {} clubs", text, clubs.len());
        Ok(self.club_views(clubs, viewer))
    }

    async fn get_club_view(&self, id: &str, viewer: Option<&str>) -> Result<Option<ClubView>> {
        let club = self.clubs.get(id).map(|club| club.clone());
        Ok(club.map(|club| self.club_view(club, viewer)))
    }

    async fn list_user_memberships(&self, user_id: &str) -> Result<Vec<MembershipWithClub>> {
        let memberships = self.memberships_where(|m| m.user_id == user_id);
        Ok(self.with_active_clubs(memberships))
    }

    async fn list_club_memberships(&self, club_id: &str) -> Result<Vec<MembershipWithUser>> {
        let memberships = self.memberships_where(|m| m.club_id == club_id);
        Ok(self.with_users(memberships))
    }

    async fn list_club_announcements(&self, club_id: &str) -> Result<Vec<AnnouncementView>> {
        let announcements = self.announcements_where(|a| a.club_id == club_id);
        Ok(self.announcement_views(announcements))
    }

    async fn list_user_announcements(&self, user_id: &str) -> Result<Vec<AnnouncementView>> {
        let club_ids: HashSet<String> = self
            .list_user_memberships(user_id)
            .await?
            .into_iter()
            .map(|m| m.membership.club_id)
            .collect();

        if club_ids.is_empty() {
            return Ok(Vec::new());
        }

        let announcements = self.announcements_where(|a| club_ids.contains(&a.club_id));
        Ok(self.announcement_views(announcements))
    }

    async fn admin_stats(&self) -> Result<AdminStats> {
        let mut stats = AdminStats::default();
        for user in self.users.iter() {
            match user.role {
                UserRole::Student => stats.total_students += 1,
                UserRole::Leader => stats.total_leaders += 1,
                UserRole::Admin => {}
            }
        }
        stats.active_clubs = self.clubs.iter().filter(|club| club.is_active).count();
        stats.total_memberships = self.memberships.len();
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::tests::new_user;
    use crate::{AnnouncementStore, ClubStore, MembershipStore, UserStore};
    use clubhub_types::{MembershipRole, NewAnnouncement, NewClub, NewMembership, User};

    async fn club(store: &MemStorage, name: &str, description: &str, category: ClubCategory) -> Club {
        store
            .create_club(NewClub::new(name, description, category))
            .await
            .unwrap()
    }

    async fn announce(store: &MemStorage, club: &Club, author: &User, title: &str) -> Announcement {
        store
            .create_announcement(NewAnnouncement {
                title: title.to_string(),
                content: format!("{} details", title),
                club_id: club.id.clone(),
                author_id: author.id.clone(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_club_views_carry_count_leader_and_viewer_status() {
        let store = MemStorage::new();
        let leader = store
            .create_user(new_user("mike", Some(UserRole::Leader)))
            .await
            .unwrap();
        let student = store.create_user(new_user("ajay", None)).await.unwrap();
        let outsider = store.create_user(new_user("md", None)).await.unwrap();

        let chess = store
            .create_club_with_leader(
                NewClub::new("Chess Club", "Strategy games", ClubCategory::Academic),
                &leader.id,
            )
            .await
            .unwrap();
        store
            .create_membership(NewMembership::new(&student.id, &chess.id))
            .await
            .unwrap();

        let views = store.list_active_clubs(Some(&student.id)).await.unwrap();
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.member_count, 2);
        assert_eq!(view.leader.as_ref().map(|u| u.id.as_str()), Some(leader.id.as_str()));
        assert_eq!(view.is_member, Some(true));
        assert_eq!(view.user_role, Some(MembershipRole::Member));

        let views = store.list_active_clubs(Some(&outsider.id)).await.unwrap();
        assert_eq!(views[0].is_member, Some(false));
        assert_eq!(views[0].user_role, None);

        let anonymous = store.list_active_clubs(None).await.unwrap();
        assert_eq!(anonymous[0].is_member, None);
    }

    #[tokio::test]
    async fn test_listings_follow_creation_order() {
        let store = MemStorage::new();
        let first = club(&store, "Alpha", "a", ClubCategory::Service).await;
        let second = club(&store, "Beta", "b", ClubCategory::Service).await;
        let third = club(&store, "Gamma", "c", ClubCategory::Service).await;

        let ids: Vec<String> = store
            .list_active_clubs(None)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.club.id)
            .collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[tokio::test]
    async fn test_category_filter_is_exact() {
        let store = MemStorage::new();
        club(&store, "Soccer", "Kick a ball", ClubCategory::Sports).await;
        club(&store, "Band", "Music", ClubCategory::Arts).await;

        let sports = store
            .list_clubs_by_category(ClubCategory::Sports, None)
            .await
            .unwrap();
        assert_eq!(sports.len(), 1);
        assert_eq!(sports[0].club.name, "Soccer");

        let service = store
            .list_clubs_by_category(ClubCategory::Service, None)
            .await
            .unwrap();
        assert!(service.is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_name_and_category_case_insensitively() {
        let store = MemStorage::new();
        club(&store, "Art Society", "Painting together", ClubCategory::Academic).await;
        club(&store, "Drama Club", "Stage plays", ClubCategory::Arts).await;
        club(&store, "Robotics", "Build robots", ClubCategory::Technology).await;

        let mut names: Vec<String> = store
            .search_clubs("art", None)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.club.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Art Society".to_string(), "Drama Club".to_string()]);

        let by_description = store.search_clubs("ROBOTS", None).await.unwrap();
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].club.name, "Robotics");
    }

    #[tokio::test]
    async fn test_soft_deleted_club_leaves_listings_but_keeps_memberships() {
        let store = MemStorage::new();
        let student = store.create_user(new_user("ajay", None)).await.unwrap();
        let chess = club(&store, "Chess Club", "Strategy", ClubCategory::Academic).await;
        let band = club(&store, "Band", "Music", ClubCategory::Arts).await;
        for c in [&chess, &band] {
            store
                .create_membership(NewMembership::new(&student.id, &c.id))
                .await
                .unwrap();
        }

        assert!(store.delete_club(&chess.id).await.unwrap());

        let active = store.list_active_clubs(None).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].club.id, band.id);
        assert!(store
            .list_clubs_by_category(ClubCategory::Academic, None)
            .await
            .unwrap()
            .is_empty());
        assert!(store.search_clubs("chess", None).await.unwrap().is_empty());

        let chess_members = store.list_club_memberships(&chess.id).await.unwrap();
        assert_eq!(chess_members.len(), 1);
        assert_eq!(chess_members[0].user.id, student.id);

        let mine = store.list_user_memberships(&student.id).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].club.id, band.id);

        // The detail view still resolves an inactive club
        let detail = store.get_club_view(&chess.id, None).await.unwrap().unwrap();
        assert!(!detail.club.is_active);
        assert_eq!(detail.member_count, 1);
    }

    #[tokio::test]
    async fn test_club_announcements_newest_first_with_club_and_author() {
        let store = MemStorage::new();
        let leader = store
            .create_user(new_user("sarah", Some(UserRole::Leader)))
            .await
            .unwrap();
        let coding = store
            .create_club_with_leader(
                NewClub::new("Coding Club", "Code", ClubCategory::Technology),
                &leader.id,
            )
            .await
            .unwrap();

        let first = announce(&store, &coding, &leader, "Kickoff").await;
        let second = announce(&store, &coding, &leader, "Hackathon").await;

        let views = store.list_club_announcements(&coding.id).await.unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].announcement.id, second.id);
        assert_eq!(views[1].announcement.id, first.id);
        assert_eq!(views[1].club.id, coding.id);
        assert_eq!(views[1].author.id, leader.id);
    }

    #[tokio::test]
    async fn test_user_announcements_aggregate_active_memberships() {
        let store = MemStorage::new();
        let leader = store
            .create_user(new_user("sarah", Some(UserRole::Leader)))
            .await
            .unwrap();
        let student = store.create_user(new_user("ajay", None)).await.unwrap();
        let loner = store.create_user(new_user("md", None)).await.unwrap();

        let chess = club(&store, "Chess Club", "Strategy", ClubCategory::Academic).await;
        let band = club(&store, "Band", "Music", ClubCategory::Arts).await;
        let soccer = club(&store, "Soccer", "Kick", ClubCategory::Sports).await;
        for c in [&chess, &band] {
            store
                .create_membership(NewMembership::new(&student.id, &c.id))
                .await
                .unwrap();
        }

        let a1 = announce(&store, &chess, &leader, "Tournament").await;
        let _other = announce(&store, &soccer, &leader, "Tryouts").await;
        let a2 = announce(&store, &band, &leader, "Concert").await;
        let a3 = announce(&store, &chess, &leader, "Results").await;

        let ids: Vec<String> = store
            .list_user_announcements(&student.id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.announcement.id)
            .collect();
        assert_eq!(ids, vec![a3.id.clone(), a2.id, a1.id]);

        store.delete_club(&band.id).await.unwrap();
        let ids: Vec<String> = store
            .list_user_announcements(&student.id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.announcement.id)
            .collect();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids[0], a3.id);

        assert!(store.list_user_announcements(&loner.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dangling_references_are_skipped() {
        let store = MemStorage::new();
        let student = store.create_user(new_user("ajay", None)).await.unwrap();
        store
            .create_membership(NewMembership::new(&student.id, "ghost-club"))
            .await
            .unwrap();
        store
            .create_membership(NewMembership::new("ghost-user", "ghost-club"))
            .await
            .unwrap();

        assert!(store.list_user_memberships(&student.id).await.unwrap().is_empty());
        let members = store.list_club_memberships("ghost-club").await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].user.id, student.id);
    }

    #[tokio::test]
    async fn test_dangling_announcements_are_skipped() {
        let store = MemStorage::new();
        let leader = store.create_user(new_user("mike", None)).await.unwrap();
        let chess = club(&store, "Chess", "Strategy", ClubCategory::Academic).await;
        announce(&store, &chess, &leader, "Kept").await;
        store
            .create_announcement(NewAnnouncement {
                title: "No author".to_string(),
                content: "Orphaned".to_string(),
                club_id: chess.id.clone(),
                author_id: "ghost-user".to_string(),
            })
            .await
            .unwrap();
        store
            .create_announcement(NewAnnouncement {
                title: "No club".to_string(),
                content: "Orphaned".to_string(),
                club_id: "ghost-club".to_string(),
                author_id: leader.id.clone(),
            })
            .await
            .unwrap();

        let views = store.list_club_announcements(&chess.id).await.unwrap();
        let titles: Vec<&str> = views.iter().map(|v| v.announcement.title.as_str()).collect();
        assert_eq!(titles, vec!["Kept"]);
        assert!(store
            .list_club_announcements("ghost-club")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_admin_stats() {
        let store = MemStorage::new();
        store
            .create_user(new_user("admin", Some(UserRole::Admin)))
            .await
            .unwrap();
        let leader = store
            .create_user(new_user("mike", Some(UserRole::Leader)))
            .await
            .unwrap();
        let student = store.create_user(new_user("ajay", None)).await.unwrap();
        store.create_user(new_user("md", None)).await.unwrap();

        let chess = store
            .create_club_with_leader(
                NewClub::new("Chess Club", "Strategy", ClubCategory::Academic),
                &leader.id,
            )
            .await
            .unwrap();
        let band = club(&store, "Band", "Music", ClubCategory::Arts).await;
        store
            .create_membership(NewMembership::new(&student.id, &chess.id))
            .await
            .unwrap();
        store.delete_club(&band.id).await.unwrap();

        let stats = store.admin_stats().await.unwrap();
        assert_eq!(
            stats,
            AdminStats {
                total_students: 2,
                total_leaders: 1,
                active_clubs: 1,
                total_memberships: 2,
            }
        );
    }
}
