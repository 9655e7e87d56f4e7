use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::ReturnDocument;

use super::MongoDB;
use crate::models::User;
use crate::utils::AppError;

/// Persistence for [`User`] records, keyed by mobile number.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Update-or-insert the record for `mobile` with a fresh code.
    async fn upsert_otp(
        &self,
        mobile: &str,
        otp: &str,
        expiry: BsonDateTime,
    ) -> Result<User, AppError>;

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError>;
}

#[async_trait]
impl UserStore for MongoDB {
    async fn upsert_otp(
        &self,
        mobile: &str,
        otp: &str,
        expiry: BsonDateTime,
    ) -> Result<User, AppError> {
        self.users()
            .find_one_and_update(
                doc! { "mobile": mobile },
                doc! { "$set": { "otp": otp, "otpExpiry": expiry } },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| AppError::DatabaseError("Upsert returned no document".to_string()))
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "mobile": mobile }).await?)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "_id": id }).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> MongoDB {
        dotenv::dotenv().ok();
        let uri = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/pickup_test".to_string());
        MongoDB::new(&uri).await.unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_upsert_keeps_one_record_per_mobile() {
        let db = test_db().await;
        let mobile = format!("test-{}", ObjectId::new().to_hex());

        let first = db.upsert_otp(&mobile, "1111", BsonDateTime::now()).await.unwrap();
        let second = db.upsert_otp(&mobile, "2222", BsonDateTime::now()).await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.otp.as_deref(), Some("2222"));

        let count = db.users().count_documents(doc! { "mobile": &mobile }).await.unwrap();
        assert_eq!(count, 1);
    }
}
