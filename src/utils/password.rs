use hmac::{Hmac, Mac};
use sha1::Sha1;
use uuid::Uuid;

use crate::utils::error::{AppError, AppResult};

type HmacSha1 = Hmac<Sha1>;

// Stored form is "salt$hexdigest", one random salt per credential row.

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = salted_digest(&salt, password)?;
    Ok(format!("{salt}${digest}"))
}

pub fn verify_password(password: &str, stored: &str) -> AppResult<bool> {
    let (salt, digest) = stored
        .split_once('$')
        .ok_or_else(|| AppError::InternalError("malformed password hash".to_string()))?;

    Ok(salted_digest(salt, password)? == digest)
}

fn salted_digest(salt: &str, password: &str) -> AppResult<String> {
    let mut mac = HmacSha1::new_from_slice(salt.as_bytes())
        .map_err(|e| AppError::InternalError(format!("failed to key HMAC: {e}")))?;
    mac.update(password.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trip() {
        let stored = hash_password("hunter2").expect("hash failed");
        assert!(verify_password("hunter2", &stored).expect("verify failed"));
        assert!(!verify_password("hunter3", &stored).expect("verify failed"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").expect("hash failed");
        let b = hash_password("same-password").expect("hash failed");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("x", "no-separator-here").is_err());
    }
}
