//! CLI commands

use anyhow::{anyhow, Context, Result};
use clubhub_core::{
    AnnouncementView, ClubCategory, ClubView, MembershipWithClub, MembershipWithUser,
};
use clubhub_service::{AppState, ClubFilter, Principal};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Output {
    Table,
    Json,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to encode JSON output")?
    );
    Ok(())
}

async fn principal(state: &AppState, username: &str) -> Result<Principal> {
    let user = state
        .storage
        .get_user_by_username(username)
        .await?
        .ok_or_else(|| anyhow!("Unknown user: {}", username))?;
    Ok(Principal::from(&user))
}

async fn optional_principal(state: &AppState, username: Option<&str>) -> Result<Option<Principal>> {
    match username {
        Some(username) => Ok(Some(principal(state, username).await?)),
        None => Ok(None),
    }
}

/// Active club whose name matches `name` ignoring case
async fn find_club(state: &AppState, name: &str, viewer: Option<&Principal>) -> Result<ClubView> {
    state
        .clubs
        .directory(&ClubFilter::Search(name.to_string()), viewer)
        .await?
        .into_iter()
        .find(|view| view.club.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| anyhow!("No active club named \"{}\"", name))
}

fn membership_badge(view: &ClubView) -> String {
    match (view.is_member, view.user_role) {
        (Some(true), Some(role)) => format!("[{}]", role).green().to_string(),
        (Some(true), None) => "[member]".green().to_string(),
        _ => String::new(),
    }
}

fn print_club_line(view: &ClubView) {
    let leader = view
        .leader
        .as_ref()
        .map(|u| u.full_name.as_str())
        .unwrap_or("no leader");
    println!(
        "  {} {} {}",
        view.club.name.bold(),
        format!("({})", view.club.category).dimmed(),
        membership_badge(view)
    );
    println!(
        "     {} members, led by {}",
        view.member_count.to_string().cyan(),
        leader
    );
    if let Some(time) = &view.club.meeting_time {
        let place = view.club.meeting_location.as_deref().unwrap_or("TBA");
        println!("     Meets {} at {}", time, place);
    }
}

pub async fn clubs(
    state: &AppState,
    output: Output,
    category: Option<ClubCategory>,
    search: Option<String>,
    as_user: Option<&str>,
) -> Result<()> {
    let viewer = optional_principal(state, as_user).await?;
    let filter = ClubFilter::from_query(category, search);
    let views = state.clubs.directory(&filter, viewer.as_ref()).await?;

    if output == Output::Json {
        return print_json(&views);
    }

    if views.is_empty() {
        println!("{}", "No clubs found".yellow());
        return Ok(());
    }

    println!("{}", format!("Clubs ({})", views.len()).blue().bold());
    println!();
    for view in &views {
        print_club_line(view);
        println!();
    }
    Ok(())
}

pub async fn club(
    state: &AppState,
    output: Output,
    name: &str,
    as_user: Option<&str>,
) -> Result<()> {
    let viewer = optional_principal(state, as_user).await?;
    let found = find_club(state, name, viewer.as_ref()).await?;
    let view = state
        .clubs
        .club_detail(&found.club.id, viewer.as_ref())
        .await?;

    if output == Output::Json {
        return print_json(&view);
    }

    print_club_line(&view);
    println!();
    println!("  {}", view.club.description);
    Ok(())
}

pub async fn members(state: &AppState, output: Output, club: &str, as_user: &str) -> Result<()> {
    let caller = principal(state, as_user).await?;
    let found = find_club(state, club, Some(&caller)).await?;
    let members: Vec<MembershipWithUser> =
        state.clubs.club_members(&caller, &found.club.id).await?;

    if output == Output::Json {
        return print_json(&members);
    }

    println!(
        "{}",
        format!("{} members ({})", found.club.name, members.len())
            .blue()
            .bold()
    );
    for entry in &members {
        println!(
            "  {:<24} {:<10} joined {}",
            entry.user.full_name,
            entry.membership.role.to_string().cyan(),
            entry.membership.joined_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

pub async fn memberships(state: &AppState, output: Output, as_user: &str) -> Result<()> {
    let caller = principal(state, as_user).await?;
    let entries: Vec<MembershipWithClub> = state.clubs.my_memberships(&caller).await?;

    if output == Output::Json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("{}", format!("{} has not joined any clubs", as_user).yellow());
        return Ok(());
    }

    println!("{}", format!("Clubs of {}", as_user).blue().bold());
    for entry in &entries {
        println!(
            "  {:<24} {:<10} {}",
            entry.club.name,
            entry.membership.role.to_string().cyan(),
            format!("({})", entry.club.category).dimmed()
        );
    }
    Ok(())
}

fn print_announcements(heading: &str, views: &[AnnouncementView]) {
    if views.is_empty() {
        println!("{}", "No announcements".yellow());
        return;
    }

    println!("{}", heading.blue().bold());
    for view in views {
        println!();
        println!(
            "  {} {}",
            view.announcement.title.bold(),
            format!("[{}]", view.club.name).dimmed()
        );
        println!(
            "  {} by {}",
            view.announcement.created_at.format("%Y-%m-%d %H:%M"),
            view.author.full_name
        );
        println!("  {}", view.announcement.content);
    }
}

pub async fn club_announcements(state: &AppState, output: Output, club: &str) -> Result<()> {
    let found = find_club(state, club, None).await?;
    let views = state.clubs.club_announcements(&found.club.id).await?;

    if output == Output::Json {
        return print_json(&views);
    }
    print_announcements(&format!("{} announcements", found.club.name), &views);
    Ok(())
}

pub async fn feed(state: &AppState, output: Output, as_user: &str) -> Result<()> {
    let caller = principal(state, as_user).await?;
    let views = state.clubs.my_announcements(&caller).await?;

    if output == Output::Json {
        return print_json(&views);
    }
    print_announcements(&format!("Announcements for {}", as_user), &views);
    Ok(())
}

pub async fn stats(state: &AppState, output: Output, as_user: &str) -> Result<()> {
    let caller = principal(state, as_user).await?;
    let stats = state.clubs.admin_stats(&caller).await?;

    if output == Output::Json {
        return print_json(&stats);
    }

    println!("{}", "School statistics".blue().bold());
    println!("  Students:     {}", stats.total_students.to_string().cyan());
    println!("  Leaders:      {}", stats.total_leaders.to_string().cyan());
    println!("  Active clubs: {}", stats.active_clubs.to_string().cyan());
    println!("  Memberships:  {}", stats.total_memberships.to_string().cyan());
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginOutput<'a> {
    user: &'a clubhub_core::User,
    token: &'a str,
    expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn login(state: &AppState, output: Output, username: &str, password: &str) -> Result<()> {
    let authenticated = state.auth.login(username, password).await?;

    if output == Output::Json {
        return print_json(&LoginOutput {
            user: &authenticated.user,
            token: &authenticated.session.token,
            expires_at: authenticated.session.expires_at,
        });
    }

    println!("{}", "Login successful!".green().bold());
    println!();
    println!(
        "   Welcome, {} ({})",
        authenticated.user.full_name.cyan(),
        authenticated.user.role
    );
    println!("   Session: {}", authenticated.session.token.dimmed());
    println!(
        "   Expires: {}",
        authenticated.session.expires_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}
