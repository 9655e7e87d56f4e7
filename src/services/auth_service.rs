use chrono::Utc;
use mongodb::bson::DateTime as BsonDateTime;
use std::fmt;

use crate::database::UserStore;
use crate::models::User;
use crate::utils::otp::{generate_otp, otp_expiry_from};
use crate::utils::AppError;

/// Why a verification attempt was refused. Never surfaced to the client:
/// every variant maps to the same "Invalid or expired OTP" response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpRejection {
    UnknownMobile,
    WrongCode,
    Expired,
}

impl fmt::Display for OtpRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OtpRejection::UnknownMobile => write!(f, "no user for mobile"),
            OtpRejection::WrongCode => write!(f, "code mismatch"),
            OtpRejection::Expired => write!(f, "code expired"),
        }
    }
}

/// Issues a fresh code for `mobile` and returns it.
pub async fn send_otp(users: &dyn UserStore, mobile: &str) -> Result<String, AppError> {
    let mobile = mobile.trim();
    if mobile.is_empty() {
        return Err(AppError::InvalidRequest("Mobile number is required".to_string()));
    }

    let otp = generate_otp();
    let expiry = otp_expiry_from(Utc::now());

    users
        .upsert_otp(mobile, &otp, BsonDateTime::from_millis(expiry.timestamp_millis()))
        .await?;

    Ok(otp)
}

/// Checks `otp` against the last code issued for `mobile` and returns the
/// user's id on success.
pub async fn verify_otp(users: &dyn UserStore, mobile: &str, otp: &str) -> Result<String, AppError> {
    let user = users.find_by_mobile(mobile.trim()).await?;

    match check_otp(user.as_ref(), otp.trim(), Utc::now().timestamp_millis()) {
        Ok(user) => Ok(user.id_hex()),
        Err(rejection) => {
            log::debug!("OTP rejected for {}: {}", mobile, rejection);
            Err(AppError::InvalidOtp)
        }
    }
}

fn check_otp<'a>(user: Option<&'a User>, otp: &str, now_millis: i64) -> Result<&'a User, OtpRejection> {
    let user = user.ok_or(OtpRejection::UnknownMobile)?;

    match user.otp.as_deref() {
        Some(stored) if !otp.is_empty() && stored == otp => {}
        _ => return Err(OtpRejection::WrongCode),
    }

    match user.otp_expiry {
        Some(expiry) if expiry.timestamp_millis() > now_millis => Ok(user),
        _ => Err(OtpRejection::Expired),
    }
}
