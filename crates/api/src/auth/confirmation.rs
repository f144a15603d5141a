//! Email confirmation codes.
//!
//! A code is an HMAC-SHA256 over the user's identity fields plus an issue
//! timestamp, keyed with a dedicated server secret. Codes are deterministic
//! for a given user state: the MAC binds (id, username, email,
//! is_confirmed), so confirming the account -- or changing the username or
//! email -- invalidates every outstanding code. Nothing is stored
//! server-side.
//!
//! Wire format: `"{ts_hex}-{mac_hex}"` where `ts_hex` is the issue time as
//! a hex Unix timestamp and `mac_hex` is the MAC truncated to 32 hex chars.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use opusdb_db::models::user::User;

type HmacSha256 = Hmac<Sha256>;

/// Truncated MAC length in hex characters (16 bytes).
const MAC_HEX_LEN: usize = 32;

/// Default code lifetime in minutes (24 hours).
const DEFAULT_CODE_EXPIRY_MINS: i64 = 24 * 60;

/// Allowed clock skew for codes issued "in the future", in seconds.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Configuration for the confirmation-code service.
#[derive(Debug, Clone)]
pub struct ConfirmationConfig {
    /// HMAC key. Must differ from the JWT secret so the two token kinds
    /// cannot be swapped for each other.
    pub secret: String,
    /// Code lifetime in minutes (default: 1440).
    pub code_expiry_mins: i64,
}

impl ConfirmationConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                      | Required | Default |
    /// |------------------------------|----------|---------|
    /// | `CONFIRMATION_SECRET`        | **yes**  | --      |
    /// | `CONFIRMATION_EXPIRY_MINS`   | no       | `1440`  |
    ///
    /// # Panics
    ///
    /// Panics if `CONFIRMATION_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("CONFIRMATION_SECRET")
            .expect("CONFIRMATION_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "CONFIRMATION_SECRET must not be empty");

        let code_expiry_mins: i64 = std::env::var("CONFIRMATION_EXPIRY_MINS")
            .unwrap_or_else(|_| DEFAULT_CODE_EXPIRY_MINS.to_string())
            .parse()
            .expect("CONFIRMATION_EXPIRY_MINS must be a valid i64");

        Self {
            secret,
            code_expiry_mins,
        }
    }
}

/// Issues and checks confirmation codes. Injected via `AppState`; handlers
/// never reach for process-wide state.
#[derive(Debug, Clone)]
pub struct ConfirmationCodeService {
    config: ConfirmationConfig,
}

impl ConfirmationCodeService {
    pub fn new(config: ConfirmationConfig) -> Self {
        Self { config }
    }

    /// Issue a code bound to the user's current state.
    pub fn issue(&self, user: &User) -> String {
        self.issue_at(user, chrono::Utc::now().timestamp())
    }

    fn issue_at(&self, user: &User, ts: i64) -> String {
        format!("{ts:x}-{}", self.mac_for(user, ts))
    }

    /// Check a code against the user's current state. Returns `false` for
    /// malformed codes, expired codes, and codes whose MAC does not match
    /// the state the user is in now.
    pub fn check(&self, user: &User, code: &str) -> bool {
        let Some((ts_hex, mac_hex)) = code.split_once('-') else {
            return false;
        };
        let Ok(ts) = i64::from_str_radix(ts_hex, 16) else {
            return false;
        };

        let now = chrono::Utc::now().timestamp();
        if ts > now + MAX_CLOCK_SKEW_SECS {
            return false;
        }
        if now - ts > self.config.code_expiry_mins * 60 {
            return false;
        }

        self.mac_for(user, ts) == mac_hex
    }

    /// HMAC over the identity fields the code is bound to, truncated.
    fn mac_for(&self, user: &User, ts: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(
            format!(
                "{}:{}:{}:{}:{}",
                user.id, user.username, user.email, user.is_confirmed, ts
            )
            .as_bytes(),
        );
        let digest = format!("{:x}", mac.finalize().into_bytes());
        digest[..MAC_HEX_LEN].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> ConfirmationCodeService {
        ConfirmationCodeService::new(ConfirmationConfig {
            secret: "confirmation-test-secret".to_string(),
            code_expiry_mins: 60,
        })
    }

    fn test_user() -> User {
        let now = chrono::Utc::now();
        User {
            id: 7,
            username: "bob".to_string(),
            email: "bob@x.com".to_string(),
            role: "user".to_string(),
            bio: String::new(),
            is_confirmed: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_code_validates() {
        let service = test_service();
        let user = test_user();
        let code = service.issue(&user);
        assert!(service.check(&user, &code));
    }

    #[test]
    fn code_is_deterministic_for_fixed_state_and_time() {
        let service = test_service();
        let user = test_user();
        let a = service.issue_at(&user, 1_900_000_000);
        let b = service.issue_at(&user, 1_900_000_000);
        assert_eq!(a, b);
    }

    #[test]
    fn confirming_the_account_consumes_the_code() {
        let service = test_service();
        let mut user = test_user();
        let code = service.issue(&user);

        user.is_confirmed = true;
        assert!(!service.check(&user, &code));
    }

    #[test]
    fn changing_email_invalidates_the_code() {
        let service = test_service();
        let mut user = test_user();
        let code = service.issue(&user);

        user.email = "new@x.com".to_string();
        assert!(!service.check(&user, &code));
    }

    #[test]
    fn expired_code_fails() {
        let service = test_service();
        let user = test_user();
        let stale = chrono::Utc::now().timestamp() - 61 * 60;
        let code = service.issue_at(&user, stale);
        assert!(!service.check(&user, &code));
    }

    #[test]
    fn future_dated_code_fails() {
        let service = test_service();
        let user = test_user();
        let future = chrono::Utc::now().timestamp() + 10 * 60;
        let code = service.issue_at(&user, future);
        assert!(!service.check(&user, &code));
    }

    #[test]
    fn malformed_codes_fail() {
        let service = test_service();
        let user = test_user();
        assert!(!service.check(&user, ""));
        assert!(!service.check(&user, "no-dash-timestamp"));
        assert!(!service.check(&user, "zzz-abcdef"));
    }

    #[test]
    fn tampered_mac_fails() {
        let service = test_service();
        let user = test_user();
        let code = service.issue(&user);
        let (ts, _) = code.split_once('-').unwrap();
        let tampered = format!("{ts}-{}", "0".repeat(MAC_HEX_LEN));
        assert!(!service.check(&user, &tampered));
    }

    #[test]
    fn different_users_get_different_codes() {
        let service = test_service();
        let alice = User {
            id: 8,
            username: "alice".to_string(),
            ..test_user()
        };
        let bob = test_user();
        let code = service.issue(&bob);
        assert!(service.check(&bob, &code));
        assert!(!service.check(&alice, &code));
    }
}
