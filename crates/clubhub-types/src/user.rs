//! User types

use crate::ParseEnumError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Account role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Leader,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Leader => "leader",
            UserRole::Admin => "admin",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "leader" => Ok(UserRole::Leader),
            "admin" => Ok(UserRole::Admin),
            _ => Err(ParseEnumError::new("user role", s)),
        }
    }
}

/// User account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Credential hash. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub school_id: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Payload for creating a user. `password` must already be hashed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub school_id: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// User registration request (plaintext password)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRegistration {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: String,
    pub school_id: String,
    #[serde(default)]
    pub role: Option<UserRole>,
}

/// User login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserLogin {
    pub username: String,
    pub password: String,
}
