//! One-time code domain model for signup verification.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Number of digits in a generated code.
pub const CODE_LEN: usize = 6;

/// Default code lifetime in minutes.
pub const DEFAULT_TTL_MINUTES: i64 = 10;

/// Why a submitted code was rejected.
///
/// Variants are ordered by evaluation priority: a used code always reports
/// `AlreadyUsed`, even when it has also expired or the submission mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OtpRejection {
    #[error("Code has already been used")]
    AlreadyUsed,

    #[error("Code has expired")]
    Expired,

    #[error("Code does not match")]
    Mismatch,
}

/// One-time verification code, 1:1 with a user.
///
/// Generating a new code replaces any prior unconsumed code for the user;
/// rows are superseded, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OneTimeCode {
    pub user_id: Uuid,
    pub code: String,
    pub expiry: DateTime<Utc>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// Whether the code has passed its expiry at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry
    }

    /// Checks a submitted code against this one.
    ///
    /// Evaluation order: verified flag, then expiry, then the code itself.
    /// Passing succeeds exactly once; the caller persists the verified flag.
    pub fn check(&self, submitted: &str, now: DateTime<Utc>) -> Result<(), OtpRejection> {
        if self.verified {
            return Err(OtpRejection::AlreadyUsed);
        }

        if self.is_expired_at(now) {
            return Err(OtpRejection::Expired);
        }

        if self.code != submitted {
            return Err(OtpRejection::Mismatch);
        }

        Ok(())
    }
}

/// Generates a random zero-padded numeric code.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    let n: u32 = rng.gen_range(0..1_000_000);
    format!("{:06}", n)
}

/// Computes the expiry timestamp for a freshly issued code.
pub fn expiry_from(now: DateTime<Utc>, ttl_minutes: i64) -> DateTime<Utc> {
    now + Duration::minutes(ttl_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_at(issued: DateTime<Utc>, code: &str) -> OneTimeCode {
        OneTimeCode {
            user_id: Uuid::new_v4(),
            code: code.to_string(),
            expiry: expiry_from(issued, DEFAULT_TTL_MINUTES),
            verified: false,
            created_at: issued,
            updated_at: issued,
        }
    }

    #[test]
    fn test_generate_code_is_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_check_succeeds_with_fresh_matching_code() {
        let t0 = Utc::now();
        let otp = code_at(t0, "482913");
        assert_eq!(otp.check("482913", t0 + Duration::minutes(5)), Ok(()));
    }

    #[test]
    fn test_check_rejects_expired_code() {
        let t0 = Utc::now();
        let otp = code_at(t0, "482913");
        assert_eq!(
            otp.check("482913", t0 + Duration::minutes(11)),
            Err(OtpRejection::Expired)
        );
    }

    #[test]
    fn test_check_rejects_mismatched_code() {
        let t0 = Utc::now();
        let otp = code_at(t0, "482913");
        assert_eq!(
            otp.check("000000", t0 + Duration::minutes(5)),
            Err(OtpRejection::Mismatch)
        );
    }

    #[test]
    fn test_used_wins_over_expired_and_mismatch() {
        // A resubmission after success must report AlreadyUsed, never
        // re-derive expiry or mismatch.
        let t0 = Utc::now();
        let mut otp = code_at(t0, "482913");
        otp.verified = true;

        assert_eq!(
            otp.check("482913", t0 + Duration::minutes(30)),
            Err(OtpRejection::AlreadyUsed)
        );
        assert_eq!(
            otp.check("000000", t0 + Duration::minutes(30)),
            Err(OtpRejection::AlreadyUsed)
        );
    }

    #[test]
    fn test_expired_wins_over_mismatch() {
        let t0 = Utc::now();
        let otp = code_at(t0, "482913");
        assert_eq!(
            otp.check("000000", t0 + Duration::minutes(11)),
            Err(OtpRejection::Expired)
        );
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let t0 = Utc::now();
        let otp = code_at(t0, "482913");
        // Exactly at expiry the code is still valid; only strictly after.
        assert_eq!(otp.check("482913", otp.expiry), Ok(()));
        assert!(otp.is_expired_at(otp.expiry + Duration::seconds(1)));
    }
}
