//! Authentication service

use crate::access::Principal;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use clubhub_core::{
    ClubError, NewUser, Result, Session, SessionStore, Storage, User, UserRegistration, UserRole,
};
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::{info, warn};

/// A user together with the session just opened for them
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: User,
    pub session: Session,
}

pub struct AuthService {
    storage: Arc<dyn Storage>,
    sessions: Arc<dyn SessionStore>,
}

impl AuthService {
    pub fn new(storage: Arc<dyn Storage>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { storage, sessions }
    }

    /// Create a student or leader account and log it in.
    pub async fn register(&self, registration: UserRegistration) -> Result<AuthenticatedSession> {
        for (field, value) in [
            ("username", &registration.username),
            ("password", &registration.password),
            ("email", &registration.email),
            ("fullName", &registration.full_name),
            ("schoolId", &registration.school_id),
        ] {
            if value.trim().is_empty() {
                return Err(ClubError::Validation(format!("{} must not be empty", field)));
            }
        }
        if registration.role == Some(UserRole::Admin) {
            return Err(ClubError::Validation(
                "admin accounts cannot be self-registered".to_string(),
            ));
        }

        let password_hash = hash_password(&registration.password)?;
        let user = self
            .storage
            .create_user(NewUser {
                username: registration.username,
                password: password_hash,
                email: registration.email,
                full_name: registration.full_name,
                school_id: registration.school_id,
                role: registration.role,
            })
            .await?;

        let session = self.sessions.create(&user.id).await?;
        info!("Registered user {} ({})", user.username, user.id);
        Ok(AuthenticatedSession { user, session })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthenticatedSession> {
        let user = self.storage.get_user_by_username(username).await?;

        if let Some(user) = user {
            if verify_password(password, &user.password) {
                let session = self.sessions.create(&user.id).await?;
                info!("User {} logged in", user.username);
                return Ok(AuthenticatedSession { user, session });
            }
        }

        warn!("Failed login attempt for {}", username);
        Err(ClubError::Unauthenticated(
            "invalid username or password".to_string(),
        ))
    }

    pub async fn logout(&self, token: &str) -> Result<bool> {
        self.sessions.destroy(token).await
    }

    /// Resolve a session token to the principal it belongs to.
    pub async fn authenticate(&self, token: &str) -> Result<Principal> {
        let session = self
            .sessions
            .get(token)
            .await?
            .ok_or_else(|| ClubError::Unauthenticated("session expired or unknown".to_string()))?;

        match self.storage.get_user(&session.user_id).await? {
            Some(user) => Ok(Principal::from(&user)),
            None => {
                self.sessions.destroy(token).await?;
                Err(ClubError::Unauthenticated(
                    "session user no longer exists".to_string(),
                ))
            }
        }
    }

    /// Current account record for a session token.
    pub async fn current_user(&self, token: &str) -> Result<User> {
        let principal = self.authenticate(token).await?;
        self.storage
            .get_user(&principal.user_id)
            .await?
            .ok_or_else(|| ClubError::not_found("User", principal.user_id))
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ClubError::Credential(format!("Failed to hash password: {}", e)))
}

/// False for a wrong password and for a stored value that is not a valid hash.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
