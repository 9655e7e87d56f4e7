pub mod admin_service;
pub mod auth_service;
pub mod order_service;
pub mod upload_service;

use mongodb::bson::oid::ObjectId;

use crate::utils::AppError;

/// Parses a hex object id supplied by a client, naming it in the error.
pub(crate) fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim()).map_err(|_| AppError::InvalidRequest(format!("Invalid {}", what)))
}
