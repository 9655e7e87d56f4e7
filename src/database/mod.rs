pub mod memory;
pub mod orders;
pub mod users;

pub use memory::InMemoryStore;
pub use orders::OrderStore;
pub use users::UserStore;

use crate::models::{Order, User, ORDERS_COLLECTION, USERS_COLLECTION};
use mongodb::{options::ClientOptions, Client, Collection, Database};
use std::error::Error;
use std::time::Duration;

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    /// Builds the client without touching the network. Only a malformed URI
    /// fails here; connectivity is checked separately by [`MongoDB::ping`].
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| "pickup".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        Ok(Self { db })
    }

    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        use mongodb::bson::doc;

        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Creates the indexes the stores rely on.
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let mobile_index = IndexModel::builder()
            .keys(doc! { "mobile": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        // Still attempt the orders index below; the mobile failure is returned afterwards.
        let mobile_result = self.users().create_index(mobile_index).await;
        match &mobile_result {
            Ok(_) => log::info!("   ✅ Index created: users(mobile) unique"),
            Err(e) => log::error!(
                "   ❌ Failed to create unique users(mobile) index, duplicate mobiles may be stored: {}",
                e
            ),
        }

        let customer_index = IndexModel::builder()
            .keys(doc! { "customer": 1, "_id": -1 })
            .build();

        self.orders().create_index(customer_index).await?;
        log::info!("   ✅ Index created: orders(customer, _id)");

        mobile_result?;
        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn users(&self) -> Collection<User> {
        self.collection(USERS_COLLECTION)
    }

    pub fn orders(&self) -> Collection<Order> {
        self.collection(ORDERS_COLLECTION)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_rejects_malformed_uri() {
        assert!(MongoDB::new("not-a-mongo-uri").await.is_err());
    }

    #[tokio::test]
    async fn test_database_name_from_uri() {
        let db = MongoDB::new("mongodb://localhost:27017/laundry").await.unwrap();
        assert_eq!(db.database().name(), "laundry");

        let db = MongoDB::new("mongodb://localhost:27017").await.unwrap();
        assert_eq!(db.database().name(), "pickup");
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/pickup_test".to_string());

        let db = MongoDB::new(&uri).await.unwrap();
        assert!(db.ping().await.is_ok());
        assert!(db.ensure_indexes().await.is_ok());
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_duplicate_mobiles_fail_index_creation() {
        use mongodb::bson::doc;

        let db = MongoDB::new("mongodb://localhost:27017/pickup_dup_test").await.unwrap();
        db.database().drop().await.unwrap();

        let raw = db.database().collection::<mongodb::bson::Document>(USERS_COLLECTION);
        raw.insert_one(doc! { "mobile": "5555555555" }).await.unwrap();
        raw.insert_one(doc! { "mobile": "5555555555" }).await.unwrap();

        assert!(db.ensure_indexes().await.is_err());
        db.database().drop().await.unwrap();
    }
}
