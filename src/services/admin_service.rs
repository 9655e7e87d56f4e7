use super::parse_object_id;
use crate::database::OrderStore;
use crate::models::{Order, OrderStatus, OrderWithCustomer};
use crate::utils::AppError;

/// Every order, newest first, with the owner's mobile attached.
pub async fn list_all_orders(orders: &dyn OrderStore) -> Result<Vec<OrderWithCustomer>, AppError> {
    orders.all_orders_with_customer().await
}

/// Moves an order to `status`. Only the four known states are accepted.
pub async fn set_order_status(
    orders: &dyn OrderStore,
    order_id: &str,
    status: &str,
) -> Result<Order, AppError> {
    let id = parse_object_id(order_id, "order id")?;
    let status: OrderStatus = status.trim().parse().map_err(AppError::InvalidRequest)?;

    orders
        .set_status(id, status)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{InMemoryStore, UserStore};
    use crate::models::NewOrder;
    use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

    async fn seeded() -> (InMemoryStore, Order) {
        let store = InMemoryStore::new();
        let user = store.upsert_otp("9999999999", "1234", BsonDateTime::now()).await.unwrap();
        let order = store
            .insert_order(Order::from(NewOrder {
                customer: user.id.unwrap(),
                category: "Blankets".into(),
                weight: 6.0,
                photos: vec!["uploads/b.jpg".into()],
                date: "2024-09-01".into(),
                time: "16:00".into(),
            }))
            .await
            .unwrap();
        (store, order)
    }

    #[tokio::test]
    async fn test_scheduled_shows_in_listing_with_mobile() {
        let (store, order) = seeded().await;
        let id = order.id.unwrap().to_hex();

        let updated = set_order_status(&store, &id, "Scheduled").await.unwrap();
        assert_eq!(updated.status, OrderStatus::Scheduled);

        let all = list_all_orders(&store).await.unwrap();
        assert_eq!(all[0].order.status, OrderStatus::Scheduled);
        assert_eq!(all[0].customer.as_ref().unwrap().mobile, "9999999999");
    }

    #[tokio::test]
    async fn test_unknown_status_rejected() {
        let (store, order) = seeded().await;
        let id = order.id.unwrap().to_hex();

        let err = set_order_status(&store, &id, "Shipped").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));

        let all = list_all_orders(&store).await.unwrap();
        assert_eq!(all[0].order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_order_not_found() {
        let (store, _) = seeded().await;
        let err = set_order_status(&store, &ObjectId::new().to_hex(), "Completed")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_malformed_order_id() {
        let (store, _) = seeded().await;
        let err = set_order_status(&store, "123", "Completed").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }
}
