use busway_shared::Masked;
use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{CoreError, CoreResult};

/// The signed-in user as returned by the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Partial profile edit; `None` fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: i64,
}

/// Authenticated context handed explicitly to whatever issues API calls.
#[derive(Debug, Clone)]
pub struct Session {
    token: Masked<String>,
    pub user: UserProfile,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: String, user: UserProfile, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: Masked::new(token),
            user,
            expires_at,
        }
    }

    /// Build a session from a JWT issued by the booking API.
    ///
    /// Only the `exp` claim is read. The signature is not checked here; the API verifies
    /// its own tokens on every request.
    pub fn from_token(token: String, user: UserProfile) -> CoreResult<Self> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = HashSet::new();

        let data = decode::<TokenClaims>(&token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| CoreError::InvalidToken(e.to_string()))?;

        let expires_at = Utc
            .timestamp_opt(data.claims.exp, 0)
            .single()
            .ok_or_else(|| CoreError::InvalidToken(format!("exp out of range: {}", data.claims.exp)))?;

        Ok(Self::new(token, user, expires_at))
    }

    pub fn token(&self) -> &str {
        self.token.expose()
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose())
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Fails with `SessionExpired` once `now` has reached the token expiry.
    pub fn ensure_active(&self, now: DateTime<Utc>) -> CoreResult<()> {
        if self.is_expired(now) {
            return Err(CoreError::SessionExpired(self.expires_at));
        }
        Ok(())
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin
    }
}

/// Owns the lifecycle of the current session: created on login, dropped on logout or expiry.
#[derive(Debug, Default)]
pub struct SessionManager {
    current: Option<Session>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Start a session, replacing any previous one. An already-expired token is refused.
    pub fn login(&mut self, session: Session, now: DateTime<Utc>) -> CoreResult<&Session> {
        session.ensure_active(now)?;
        tracing::info!(user_id = %session.user.id, expires_at = %session.expires_at, "Session started");
        let session = self.current.insert(session);
        Ok(&*session)
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.current.take() {
            tracing::info!(user_id = %session.user.id, "Session ended");
        }
    }

    /// The active session, if any. An expired session is destroyed on access.
    pub fn current(&mut self, now: DateTime<Utc>) -> Option<&Session> {
        if self.current.as_ref().is_some_and(|s| s.is_expired(now)) {
            tracing::debug!("Dropping expired session");
            self.current = None;
        }
        self.current.as_ref()
    }

    pub fn is_admin(&mut self, now: DateTime<Utc>) -> bool {
        self.current(now).is_some_and(Session::is_admin)
    }

    /// Merge a profile edit into the signed-in user. Returns `false` when nobody is signed in.
    pub fn update_profile(&mut self, update: ProfileUpdate) -> bool {
        let Some(session) = self.current.as_mut() else {
            return false;
        };

        if let Some(name) = update.name {
            session.user.name = name;
        }
        if let Some(email) = update.email {
            session.user.email = email;
        }
        if let Some(phone) = update.phone {
            session.user.phone = Some(phone);
        }
        true
    }
}
