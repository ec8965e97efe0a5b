//! Membership types

use crate::ParseEnumError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Role a user holds inside one club
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    #[default]
    Member,
    Officer,
    Leader,
}

impl MembershipRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipRole::Member => "member",
            MembershipRole::Officer => "officer",
            MembershipRole::Leader => "leader",
        }
    }
}

impl std::fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "member" => Ok(MembershipRole::Member),
            "officer" => Ok(MembershipRole::Officer),
            "leader" => Ok(MembershipRole::Leader),
            _ => Err(ParseEnumError::new("membership role", s)),
        }
    }
}

/// A user's membership in a club
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub id: String,
    pub user_id: String,
    pub club_id: String,
    pub role: MembershipRole,
    pub joined_at: DateTime<Utc>,
}

/// Payload for creating a membership
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMembership {
    pub user_id: String,
    pub club_id: String,
    #[serde(default)]
    pub role: Option<MembershipRole>,
}

impl NewMembership {
    pub fn new(user_id: impl Into<String>, club_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            club_id: club_id.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: MembershipRole) -> Self {
        self.role = Some(role);
        self
    }
}
