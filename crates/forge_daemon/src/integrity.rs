//! Keyed-hash integrity tags for stored saves.
//!
//! HMAC-SHA-256 over the serialized game-state string, base64-encoded. The
//! tag proves the stored blob was written by this server; it does not prove
//! who asked for the write.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ring::hmac;

pub struct IntegrityKey(hmac::Key);

impl IntegrityKey {
    pub fn new(secret: &str) -> Self {
        IntegrityKey(hmac::Key::new(hmac::HMAC_SHA256, secret.as_bytes()))
    }

    /// Base64 tag over the payload.
    pub fn tag(&self, payload: &str) -> String {
        STANDARD.encode(hmac::sign(&self.0, payload.as_bytes()).as_ref())
    }

    /// Constant-time verification of a stored tag against the payload.
    pub fn verify(&self, payload: &str, tag_b64: &str) -> bool {
        let Ok(tag) = STANDARD.decode(tag_b64) else {
            return false;
        };
        hmac::verify(&self.0, payload.as_bytes(), &tag).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_is_deterministic_for_same_payload_and_secret() {
        let key = IntegrityKey::new("secret");
        assert_eq!(key.tag("payload"), key.tag("payload"));
    }

    #[test]
    fn tag_changes_with_payload() {
        let key = IntegrityKey::new("secret");
        assert_ne!(key.tag("payload"), key.tag("payload2"));
    }

    #[test]
    fn tag_changes_with_secret() {
        let a = IntegrityKey::new("secret-a");
        let b = IntegrityKey::new("secret-b");
        assert_ne!(a.tag("payload"), b.tag("payload"));
    }

    #[test]
    fn verify_accepts_untouched_payload() {
        let key = IntegrityKey::new("secret");
        let tag = key.tag("payload");
        assert!(key.verify("payload", &tag));
    }

    #[test]
    fn verify_rejects_any_modification() {
        let key = IntegrityKey::new("secret");
        let tag = key.tag("payload");
        assert!(!key.verify("payloae", &tag));
        assert!(!key.verify("payload ", &tag));
    }

    #[test]
    fn verify_rejects_garbage_tag() {
        let key = IntegrityKey::new("secret");
        assert!(!key.verify("payload", "not base64 at all!"));
        assert!(!key.verify("payload", ""));
    }
}
