use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use tokio::sync::RwLock;

use super::{OrderStore, UserStore};
use crate::models::{CustomerSummary, Order, OrderStatus, OrderWithCustomer, User};
use crate::utils::AppError;

/// Process-local implementation of both stores.
///
/// Records live in insertion order, so "newest first" is a reverse scan.
/// Used by the test suites and handy for running the API without MongoDB.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<Vec<User>>,
    orders: RwLock<Vec<Order>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn upsert_otp(
        &self,
        mobile: &str,
        otp: &str,
        expiry: BsonDateTime,
    ) -> Result<User, AppError> {
        let mut users = self.users.write().await;

        if let Some(user) = users.iter_mut().find(|u| u.mobile == mobile) {
            user.otp = Some(otp.to_string());
            user.otp_expiry = Some(expiry);
            return Ok(user.clone());
        }

        let user = User {
            id: Some(ObjectId::new()),
            mobile: mobile.to_string(),
            otp: Some(otp.to_string()),
            otp_expiry: Some(expiry),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_mobile(&self, mobile: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.iter().find(|u| u.mobile == mobile).cloned())
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.iter().find(|u| u.id == Some(id)).cloned())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn insert_order(&self, mut order: Order) -> Result<Order, AppError> {
        order.id = Some(ObjectId::new());
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn orders_for_customer(&self, customer: ObjectId) -> Result<Vec<Order>, AppError> {
        Ok(self
            .orders
            .read()
            .await
            .iter()
            .rev()
            .filter(|o| o.customer == customer)
            .cloned()
            .collect())
    }

    async fn all_orders_with_customer(&self) -> Result<Vec<OrderWithCustomer>, AppError> {
        let users = self.users.read().await;
        let orders = self.orders.read().await;

        Ok(orders
            .iter()
            .rev()
            .map(|order| OrderWithCustomer {
                order: order.clone(),
                customer: users
                    .iter()
                    .find(|u| u.id == Some(order.customer))
                    .map(|u| CustomerSummary {
                        id: u.id_hex(),
                        mobile: u.mobile.clone(),
                    }),
            })
            .collect())
    }

    async fn set_status(&self, id: ObjectId, status: OrderStatus) -> Result<Option<Order>, AppError> {
        let mut orders = self.orders.write().await;
        Ok(orders.iter_mut().find(|o| o.id == Some(id)).map(|o| {
            o.status = status;
            o.clone()
        }))
    }
}
