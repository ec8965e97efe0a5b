//! Club types

use crate::ParseEnumError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Club category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClubCategory {
    Academic,
    Sports,
    Arts,
    Technology,
    Service,
}

impl ClubCategory {
    pub const ALL: [ClubCategory; 5] = [
        ClubCategory::Academic,
        ClubCategory::Sports,
        ClubCategory::Arts,
        ClubCategory::Technology,
        ClubCategory::Service,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClubCategory::Academic => "Academic",
            ClubCategory::Sports => "Sports",
            ClubCategory::Arts => "Arts",
            ClubCategory::Technology => "Technology",
            ClubCategory::Service => "Service",
        }
    }
}

impl std::fmt::Display for ClubCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClubCategory {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseEnumError::new("club category", s))
    }
}

/// A club. `is_active == false` means the club was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ClubCategory,
    pub leader_id: Option<String>,
    pub meeting_time: Option<String>,
    pub meeting_location: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Club {
    /// Case-insensitive substring match over name, description and category.
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.category.as_str().to_lowercase().contains(needle)
    }
}

/// Payload for creating a club
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClub {
    pub name: String,
    pub description: String,
    pub category: ClubCategory,
    #[serde(default)]
    pub leader_id: Option<String>,
    #[serde(default)]
    pub meeting_time: Option<String>,
    #[serde(default)]
    pub meeting_location: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl NewClub {
    pub fn new(name: impl Into<String>, description: impl Into<String>, category: ClubCategory) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category,
            leader_id: None,
            meeting_time: None,
            meeting_location: None,
            is_active: None,
        }
    }

    pub fn meeting(mut self, time: impl Into<String>, location: impl Into<String>) -> Self {
        self.meeting_time = Some(time.into());
        self.meeting_location = Some(location.into());
        self
    }
}

/// Partial club update. Nullable columns use `Option<Option<_>>` so a
/// caller can clear them with an explicit `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ClubCategory>,
    #[serde(
        default,
        deserialize_with = "crate::nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub leader_id: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "crate::nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub meeting_time: Option<Option<String>>,
    #[serde(
        default,
        deserialize_with = "crate::nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub meeting_location: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ClubUpdate {
    /// Return a copy of `club` with the present fields replaced.
    pub fn merge(&self, club: &Club) -> Club {
        let mut merged = club.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(description) = &self.description {
            merged.description = description.clone();
        }
        if let Some(category) = self.category {
            merged.category = category;
        }
        if let Some(leader_id) = &self.leader_id {
            merged.leader_id = leader_id.clone();
        }
        if let Some(meeting_time) = &self.meeting_time {
            merged.meeting_time = meeting_time.clone();
        }
        if let Some(meeting_location) = &self.meeting_location {
            merged.meeting_location = meeting_location.clone();
        }
        if let Some(is_active) = self.is_active {
            merged.is_active = is_active;
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn club() -> Club {
        Club {
            id: "c1".to_string(),
            name: "Art Society".to_string(),
            description: "Painting and sketching".to_string(),
            category: ClubCategory::Arts,
            leader_id: Some("u1".to_string()),
            meeting_time: Some("Fridays 3pm".to_string()),
            meeting_location: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("arts".parse::<ClubCategory>(), Ok(ClubCategory::Arts));
        assert_eq!("Technology".parse::<ClubCategory>(), Ok(ClubCategory::Technology));
        assert!("Music".parse::<ClubCategory>().is_err());
    }

    #[test]
    fn test_matches_name_description_and_category() {
        let club = club();
        assert!(club.matches("art"));
        assert!(club.matches("sketch"));
        assert!(club.matches("arts"));
        assert!(!club.matches("robot"));
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let club = club();
        let update = ClubUpdate {
            name: Some("Art Guild".to_string()),
            ..Default::default()
        };

        let merged = update.merge(&club);
        assert_eq!(merged.name, "Art Guild");
        assert_eq!(merged.description, club.description);
        assert_eq!(merged.leader_id, club.leader_id);
        assert_eq!(merged.created_at, club.created_at);
    }

    #[test]
    fn test_update_distinguishes_null_from_missing() {
        let update: ClubUpdate =
            serde_json::from_str(r#"{ "meetingTime": null, "meetingLocation": "Room 4" }"#).unwrap();
        assert_eq!(update.meeting_time, Some(None));
        assert_eq!(update.meeting_location, Some(Some("Room 4".to_string())));
        assert_eq!(update.leader_id, None);

        let merged = update.merge(&club());
        assert_eq!(merged.meeting_time, None);
        assert_eq!(merged.meeting_location.as_deref(), Some("Room 4"));
        assert_eq!(merged.leader_id.as_deref(), Some("u1"));
    }
}
