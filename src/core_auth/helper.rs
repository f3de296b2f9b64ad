use bcrypt::verify;
use log::warn;

fn is_bcrypt_hash(stored: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| stored.starts_with(prefix))
}

/// Checks a client password against the stored value, which is either
/// plain text or a bcrypt hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_bcrypt_hash(stored) {
        return verify(password, stored).unwrap_or_else(|e| {
            warn!("Stored bcrypt hash could not be verified: {}", e);
            false
        });
    }
    password == stored
}
