//! Auth Session Service
//!
//! Sign-up, log-in and log-out on top of the user repository. The current
//! session is published through a watch channel so screens can react to
//! login state without polling.

use tokio::sync::watch;

use super::IdentityProvider;
use crate::domain::{DomainError, DomainResult, UserProfile};
use crate::repository::UserRepository;

const MIN_PASSWORD_LEN: usize = 6;

pub struct AuthService {
    users: UserRepository,
    session: watch::Sender<Option<UserProfile>>,
}

impl AuthService {
    pub fn new(users: UserRepository) -> Self {
        let (session, _) = watch::channel(None);
        Self { users, session }
    }

    /// Register a new user and start their session
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> DomainResult<UserProfile> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::InvalidInput(format!(
                "Invalid email address: {}",
                email
            )));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::InvalidInput(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let mut profile = UserProfile::new(new_user_id(email), email);
        profile.display_name = display_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        self.users
            .create(&profile, &credential_hash(email, password))
            .await?;

        log::info!("Registered user {}", profile.id);
        self.session.send_replace(Some(profile.clone()));
        Ok(profile)
    }

    /// Start a session for an existing user
    pub async fn log_in(&self, email: &str, password: &str) -> DomainResult<UserProfile> {
        let email = email.trim();
        let profile = self
            .users
            .verify_credentials(email, &credential_hash(email, password))
            .await?
            .ok_or_else(|| DomainError::AuthFailed("Wrong email or password".to_string()))?;

        log::info!("User {} logged in", profile.id);
        self.session.send_replace(Some(profile.clone()));
        Ok(profile)
    }

    /// End the current session, if any
    pub fn log_out(&self) {
        if let Some(user) = self.session.send_replace(None) {
            log::info!("User {} logged out", user.id);
        }
    }

    /// Profile of the logged-in user, if any
    pub fn current_profile(&self) -> Option<UserProfile> {
        self.session.borrow().clone()
    }

    /// Observe login/logout transitions
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.session.subscribe()
    }
}

impl IdentityProvider for AuthService {
    fn current_user(&self) -> Option<String> {
        self.session.borrow().as_ref().map(|u| u.id.clone())
    }
}

fn credential_hash(email: &str, password: &str) -> String {
    blake3::hash(format!("{}:{}", email, password).as_bytes())
        .to_hex()
        .to_string()
}

/// Opaque user id: blake3(email|signup_ms), truncated
fn new_user_id(email: &str) -> String {
    let now = chrono::Local::now().timestamp_millis();
    let digest = blake3::hash(format!("{}|{}", email, now).as_bytes()).to_hex();
    digest[..32].to_string()
}
