use chrono::{DateTime, Duration, Utc};
use rand::Rng;

/// Validity window of an issued code.
pub const OTP_TTL_MINUTES: i64 = 5;

/// Generates a 4-digit numeric code (1000..=9999, never a leading zero).
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(1000..=9999).to_string()
}

pub fn otp_expiry_from(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(OTP_TTL_MINUTES)
}
