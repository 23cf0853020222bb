use actix_session::Session;
use actix_web::cookie::Key;

use crate::utils::error::{AppError, AppResult};

/// Session key carrying the admin flag.
pub const ADMIN_FLAG: &str = "admin";

/// Gate for admin routes: passes only when the session flag is set.
pub fn require_admin(session: &Session) -> AppResult<()> {
    let logged_in = session
        .get::<bool>(ADMIN_FLAG)
        .map_err(|e| AppError::InternalError(format!("failed to read session: {e}")))?
        .unwrap_or(false);

    if logged_in {
        Ok(())
    } else {
        Err(AppError::NotLoggedIn)
    }
}

pub fn is_logged_in(session: &Session) -> bool {
    matches!(session.get::<bool>(ADMIN_FLAG), Ok(Some(true)))
}

/// Builds the cookie-signing key from the configured secret.
///
/// `Key::from` needs at least 64 bytes, so a shorter secret is repeated until
/// it is long enough. Without a secret a fresh key is generated, which
/// invalidates all sessions on restart.
pub fn session_key(secret: Option<&str>) -> Key {
    match secret {
        Some(s) if !s.is_empty() => {
            let mut bytes = s.as_bytes().to_vec();
            while bytes.len() < 64 {
                bytes.extend_from_slice(s.as_bytes());
            }
            Key::from(&bytes)
        }
        _ => {
            log::warn!("SESSION_SECRET not set, generating a volatile session key");
            Key::generate()
        }
    }
}
