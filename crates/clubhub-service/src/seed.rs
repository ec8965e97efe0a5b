//! Sample school used for demos and local runs

use crate::services::auth::hash_password;
use clubhub_core::{
    ClubCategory, MembershipRole, NewAnnouncement, NewClub, NewMembership, NewUser, Result,
    Storage, UserRole,
};
use std::collections::HashMap;
use tracing::info;

/// (username, email, full name, school id, role)
const USERS: &[(&str, &str, &str, &str, UserRole)] = &[
    ("admin", "admin@school.clubhub", "School Administrator", "ADMIN001", UserRole::Admin),
    ("mdleader", "md.jyaulh@school.clubhub", "Mike Johnson", "STU001", UserRole::Leader),
    ("letsupgrade", "letsupgrade@school.clubhub", "Sarah Chen", "STU002", UserRole::Leader),
    ("ajaytudent", "alay.kumar@school.clubhub", "Ajay Kumar", "STU003", UserRole::Student),
    ("shashi208", "shashi028@school.clubhub", "Shashi Singh", "STU004", UserRole::Student),
    ("hasnainjh", "hasnainjh@school.clubhub", "Md Hasnain", "STU005", UserRole::Student),
];

struct ClubSeed {
    name: &'static str,
    description: &'static str,
    category: ClubCategory,
    leader: &'static str,
    meeting_time: &'static str,
    meeting_location: &'static str,
}

const CLUBS: &[ClubSeed] = &[
    ClubSeed {
        name: "Programming Club",
        description: "Learn coding, build projects, and participate in hackathons. Welcome to students of all skill levels!",
        category: ClubCategory::Technology,
        leader: "mdleader",
        meeting_time: "Fridays 4:00 PM",
        meeting_location: "Computer Lab 201",
    },
    ClubSeed {
        name: "Art Society",
        description: "Express your creativity through various art forms including painting, sculpture, and digital art.",
        category: ClubCategory::Arts,
        leader: "letsupgrade",
        meeting_time: "Wednesdays 3:30 PM",
        meeting_location: "Art Studio B",
    },
    ClubSeed {
        name: "Debate Club",
        description: "Develop public speaking skills and engage in thoughtful discussions on current events.",
        category: ClubCategory::Academic,
        leader: "mdleader",
        meeting_time: "Tuesdays 4:15 PM",
        meeting_location: "Room 105",
    },
    ClubSeed {
        name: "Soccer Team",
        description: "Competitive soccer team representing our school. Join us for practices and matches!",
        category: ClubCategory::Sports,
        leader: "letsupgrade",
        meeting_time: "Monday & Thursday 5:00 PM",
        meeting_location: "Soccer Field",
    },
    ClubSeed {
        name: "Community Volunteers",
        description: "Make a difference in our community through service projects and volunteer work.",
        category: ClubCategory::Service,
        leader: "mdleader",
        meeting_time: "Saturdays 10:00 AM",
        meeting_location: "Student Center",
    },
];

/// (username, club name, role)
const MEMBERSHIPS: &[(&str, &str, MembershipRole)] = &[
    ("ajaytudent", "Programming Club", MembershipRole::Member),
    ("ajaytudent", "Debate Club", MembershipRole::Member),
    ("shashi208", "Art Society", MembershipRole::Member),
    ("shashi208", "Programming Club", MembershipRole::Member),
    ("hasnainjh", "Soccer Team", MembershipRole::Member),
    ("hasnainjh", "Community Volunteers", MembershipRole::Member),
    ("ajaytudent", "Community Volunteers", MembershipRole::Officer),
];

/// (club name, author username, title, content)
const ANNOUNCEMENTS: &[(&str, &str, &str, &str)] = &[
    (
        "Programming Club",
        "mdleader",
        "Hackathon Registration Open!",
        "Our annual hackathon is coming up next month. Registration is now open for all skill levels. Prizes include $500 gift cards and internship opportunities!",
    ),
    (
        "Debate Club",
        "mdleader",
        "Weekly Meeting Canceled",
        "This week's meeting is canceled due to the school holiday. We'll resume next week with our planned debate on climate policy.",
    ),
    (
        "Art Society",
        "letsupgrade",
        "Art Exhibition Next Friday",
        "Come display your artwork at our monthly exhibition! Setup starts at 2 PM in the main hallway. Refreshments will be provided.",
    ),
    (
        "Soccer Team",
        "letsupgrade",
        "Soccer Practice Schedule Update",
        "Due to field maintenance, Tuesday's practice is moved to Wednesday at 5 PM. Thursday practice remains the same.",
    ),
    (
        "Community Volunteers",
        "mdleader",
        "Food Drive This Weekend",
        "Join us for our monthly food drive at the local food bank. We meet at the student center at 10 AM. Volunteer hours will be provided!",
    ),
];

/// Counts of what was inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub clubs: usize,
    pub memberships: usize,
    pub announcements: usize,
}

/// Load the sample school into `storage`. Every account gets `password`.
/// Club leaders receive a `leader` membership in the clubs they run.
pub async fn seed_demo_data(storage: &dyn Storage, password: &str) -> Result<SeedSummary> {
    info!("Seeding demo data...");
    let password_hash = hash_password(password)?;
    let mut summary = SeedSummary::default();

    let mut user_ids = HashMap::new();
    for (username, email, full_name, school_id, role) in USERS {
        let user = storage
            .create_user(NewUser {
                username: username.to_string(),
                password: password_hash.clone(),
                email: email.to_string(),
                full_name: full_name.to_string(),
                school_id: school_id.to_string(),
                role: Some(*role),
            })
            .await?;
        user_ids.insert(*username, user.id);
        summary.users += 1;
    }

    let mut club_ids = HashMap::new();
    for seed in CLUBS {
        let leader_id = &user_ids[seed.leader];
        let club = storage
            .create_club_with_leader(
                NewClub::new(seed.name, seed.description, seed.category)
                    .meeting(seed.meeting_time, seed.meeting_location),
                leader_id,
            )
            .await?;
        club_ids.insert(seed.name, club.id);
        summary.clubs += 1;
        summary.memberships += 1;
    }

    for (username, club_name, role) in MEMBERSHIPS {
        storage
            .create_membership(
                NewMembership::new(&user_ids[username], &club_ids[club_name]).with_role(*role),
            )
            .await?;
        summary.memberships += 1;
    }

    for (club_name, author, title, content) in ANNOUNCEMENTS {
        storage
            .create_announcement(NewAnnouncement {
                title: title.to_string(),
                content: content.to_string(),
                club_id: club_ids[club_name].clone(),
                author_id: user_ids[author].clone(),
            })
            .await?;
        summary.announcements += 1;
    }

    info!(
        "Demo data seeded: {} users, {} clubs, {} memberships, {} announcements",
        summary.users, summary.clubs, summary.memberships, summary.announcements
    );
    Ok(summary)
}
