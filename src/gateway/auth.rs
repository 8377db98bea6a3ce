//! Sessions and the administrator allow-list.

use super::GatewayError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Row of the administrator allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub is_active: bool,
}

/// The signed-in user as the auth backend reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub email_verified: bool,
}

/// Session management and the administrator lookup.
pub trait AuthGateway {
    /// Current session, if anyone is signed in.
    fn session(&self) -> Result<Option<Session>, GatewayError>;

    fn sign_in(&self, email: &str, password: &str) -> Result<Session, GatewayError>;

    fn sign_out(&self) -> Result<(), GatewayError>;

    /// Allow-list row for `email`, active or not.
    fn find_admin(&self, email: &str) -> Result<Option<AdminUser>, GatewayError>;
}

/// Why an admin-only action was refused.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AccessError {
    #[error("Not signed in")]
    NoSession,
    #[error("Email address is not verified")]
    UnverifiedEmail,
    #[error("{0} is not an active administrator")]
    NotAdmin(String),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// The active administrator behind the current session.
///
/// Access needs a session whose email is present and verified, and an
/// allow-list row for that email with `is_active` set.
pub fn require_admin(auth: &impl AuthGateway) -> Result<AdminUser, AccessError> {
    let session = auth.session()?.ok_or(AccessError::NoSession)?;
    let email = match (&session.email, session.email_verified) {
        (Some(email), true) => email,
        _ => return Err(AccessError::UnverifiedEmail),
    };

    match auth.find_admin(email)? {
        Some(admin) if admin.is_active => Ok(admin),
        _ => Err(AccessError::NotAdmin(email.clone())),
    }
}
