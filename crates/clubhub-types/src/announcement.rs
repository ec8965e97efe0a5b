//! Announcement types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message posted to a club
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    pub club_id: String,
    pub author_id: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating an announcement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub club_id: String,
    pub author_id: String,
}

/// Partial announcement update. Only the text can change; club and author
/// are fixed when the announcement is posted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl AnnouncementUpdate {
    /// Return a copy of `announcement` with the present fields replaced.
    pub fn merge(&self, announcement: &Announcement) -> Announcement {
        let mut merged = announcement.clone();
        if let Some(title) = &self.title {
            merged.title = title.clone();
        }
        if let Some(content) = &self.content {
            merged.content = content.clone();
        }
        merged
    }
}
