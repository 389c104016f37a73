//! Administrator credential hashing and verification.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed(password: &str) -> HmacSha256 {
    HmacSha256::new_from_slice(password.as_bytes()).expect("HMAC accepts any key length")
}

/// Hashes an administrator password.
///
/// The password is the HMAC key over an empty message; the result is the
/// 64-character lowercase hex MAC. The same value is stored in the `auth`
/// cookie after a successful login.
pub fn hash_password(password: &str) -> String {
    hex::encode(keyed(password).finalize().into_bytes())
}

/// Gate for management operations.
///
/// Holds the MAC keyed with the configured secret, never the secret itself.
/// Without a configured secret nothing is ever authorized.
#[derive(Clone)]
pub struct AuthService {
    mac: Option<HmacSha256>,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthService")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

impl AuthService {
    /// Creates the service from the raw administrator secret, if one is configured.
    pub fn new(secret: Option<&str>) -> Self {
        Self {
            mac: secret.filter(|s| !s.is_empty()).map(keyed),
        }
    }

    /// Whether an administrator secret is configured at all.
    pub fn is_enabled(&self) -> bool {
        self.mac.is_some()
    }

    /// Checks a login attempt. Returns the session credential on success.
    pub fn login(&self, password: &str) -> Option<String> {
        if password.is_empty() {
            return None;
        }

        let candidate = hash_password(password);
        self.authorize(&candidate).then_some(candidate)
    }

    /// Checks a session credential (cookie value or bearer token).
    ///
    /// The hex-decoded credential is compared as a MAC tag in constant time.
    pub fn authorize(&self, credential: &str) -> bool {
        let Some(mac) = &self.mac else {
            return false;
        };
        match hex::decode(credential) {
            Ok(tag) => mac.clone().verify_slice(&tag).is_ok(),
            Err(_) => false,
        }
    }
}
