use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::error;

/// Oldest accepted request timestamp, in seconds.
const MAX_AGE_SECS: u64 = 300;
/// Tolerated clock skew for timestamps from the future.
const MAX_SKEW_SECS: u64 = 60;

pub fn verify_slack_signature(
    request_body: &str,
    timestamp: &str,
    signature: &str,
    signing_secret: &str,
) -> bool {
    let Ok(ts) = timestamp.parse::<u64>() else {
        error!("Malformed request timestamp: '{}'", timestamp);
        return false;
    };
    if let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) {
        let now_secs = now.as_secs();
        if now_secs.saturating_sub(ts) > MAX_AGE_SECS || ts > now_secs + MAX_SKEW_SECS {
            error!("Timestamp out of range, potential replay attack");
            return false;
        }
    }

    let Some(computed_signature) = compute_signature(timestamp, request_body, signing_secret)
    else {
        return false;
    };

    if computed_signature == signature {
        true
    } else {
        error!(
            "Signature verification failed. Computed: '{}', Received: '{}'",
            computed_signature, signature
        );
        false
    }
}

/// `v0=<hex hmac-sha256>` over `v0:{timestamp}:{body}`.
#[must_use]
pub fn compute_signature(
    timestamp: &str,
    request_body: &str,
    signing_secret: &str,
) -> Option<String> {
    let base_string = format!("v0:{timestamp}:{request_body}");
    let mut mac = match Hmac::<Sha256>::new_from_slice(signing_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(e) => {
            error!("Failed to create HMAC: {}", e);
            return None;
        }
    };
    mac.update(base_string.as_bytes());
    Some(format!("v0={}", hex::encode(mac.finalize().into_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
            .to_string()
    }

    #[test]
    fn accepts_a_fresh_valid_signature() {
        let ts = now();
        let sig = compute_signature(&ts, "text=hi", "secret").unwrap();
        assert!(verify_slack_signature("text=hi", &ts, &sig, "secret"));
    }

    #[test]
    fn rejects_a_tampered_body() {
        let ts = now();
        let sig = compute_signature(&ts, "text=hi", "secret").unwrap();
        assert!(!verify_slack_signature("text=bye", &ts, &sig, "secret"));
    }

    #[test]
    fn rejects_stale_and_malformed_timestamps() {
        let sig = compute_signature("1000", "text=hi", "secret").unwrap();
        assert!(!verify_slack_signature("text=hi", "1000", &sig, "secret"));
        assert!(!verify_slack_signature("text=hi", "soon", &sig, "secret"));
    }
}
