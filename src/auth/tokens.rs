use rand::{Rng, RngCore};
use time::{Duration, OffsetDateTime};

pub const VERIFICATION_CODE_TTL: Duration = Duration::hours(24);
pub const RESET_TOKEN_TTL: Duration = Duration::hours(1);

/// A single-use token together with its expiry.
///
/// Value and expiry always travel as a pair; a `User` either has the whole
/// pair or nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub value: String,
    pub expires_at: OffsetDateTime,
}

impl IssuedToken {
    /// A token is live strictly before its expiry; a check at exactly
    /// `expires_at` fails.
    pub fn is_live(&self, now: OffsetDateTime) -> bool {
        self.expires_at > now
    }
}

/// 6-digit numeric code sent by email, valid for 24 hours.
pub fn issue_verification_code() -> IssuedToken {
    let code: u32 = rand::thread_rng().gen_range(100_000..=999_999);
    IssuedToken {
        value: code.to_string(),
        expires_at: OffsetDateTime::now_utc() + VERIFICATION_CODE_TTL,
    }
}

/// 20 random bytes hex-encoded, embedded in the reset link, valid for 1 hour.
pub fn issue_reset_token() -> IssuedToken {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill_bytes(&mut bytes);
    IssuedToken {
        value: hex::encode(bytes),
        expires_at: OffsetDateTime::now_utc() + RESET_TOKEN_TTL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verification_code_is_six_digits_in_range() {
        for _ in 0..100 {
            let token = issue_verification_code();
            assert_eq!(token.value.len(), 6);
            let code: u32 = token.value.parse().expect("code should be numeric");
            assert!((100_000..=999_999).contains(&code));
        }
    }

    #[test]
    fn verification_code_expires_in_24_hours() {
        let now = OffsetDateTime::now_utc();
        let token = issue_verification_code();
        let ttl = token.expires_at - now;
        assert!(ttl > Duration::hours(23));
        assert!(ttl <= Duration::hours(24) + Duration::minutes(1));
    }

    #[test]
    fn reset_token_is_40_hex_chars() {
        let token = issue_reset_token();
        assert_eq!(token.value.len(), 40);
        let bytes = hex::decode(&token.value).expect("token should be valid hex");
        assert_eq!(bytes.len(), 20);
    }

    #[test]
    fn reset_tokens_are_unique() {
        let a = issue_reset_token();
        let b = issue_reset_token();
        assert_ne!(a.value, b.value);
    }

    #[test]
    fn reset_token_expires_in_1_hour() {
        let now = OffsetDateTime::now_utc();
        let token = issue_reset_token();
        let ttl = token.expires_at - now;
        assert!(ttl > Duration::minutes(59));
        assert!(ttl <= Duration::hours(1) + Duration::minutes(1));
    }

    #[test]
    fn token_is_dead_at_exact_expiry() {
        let now = OffsetDateTime::now_utc();
        let token = IssuedToken {
            value: "123456".into(),
            expires_at: now,
        };
        assert!(!token.is_live(now));
        assert!(token.is_live(now - Duration::seconds(1)));
        assert!(!token.is_live(now + Duration::seconds(1)));
    }
}
