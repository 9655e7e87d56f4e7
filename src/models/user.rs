use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

pub const USERS_COLLECTION: &str = "users";

/// One record per mobile number, carrying the last issued OTP.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub mobile: String,
    #[serde(default)]
    pub otp: Option<String>,
    #[serde(rename = "otpExpiry", default)]
    pub otp_expiry: Option<BsonDateTime>,
}

impl User {
    pub fn id_hex(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub mobile: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SendOtpResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub mobile: String,
    #[serde(default)]
    pub otp: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    pub success: bool,
    pub user_id: String,
}
