use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Document};
use mongodb::options::ReturnDocument;

use super::MongoDB;
use crate::models::{
    CustomerSummary, Order, OrderStatus, OrderWithCustomer, USERS_COLLECTION,
};
use crate::utils::AppError;

/// Persistence for [`Order`] records.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts `order` and returns it with its assigned id.
    async fn insert_order(&self, order: Order) -> Result<Order, AppError>;

    /// Orders owned by `customer`, newest first.
    async fn orders_for_customer(&self, customer: ObjectId) -> Result<Vec<Order>, AppError>;

    /// Every order, newest first, joined with its owner's mobile.
    async fn all_orders_with_customer(&self) -> Result<Vec<OrderWithCustomer>, AppError>;

    /// Overwrites the status; `None` if no order has `id`.
    async fn set_status(&self, id: ObjectId, status: OrderStatus) -> Result<Option<Order>, AppError>;
}

#[async_trait]
impl OrderStore for MongoDB {
    async fn insert_order(&self, mut order: Order) -> Result<Order, AppError> {
        let result = self.orders().insert_one(&order).await?;
        order.id = result.inserted_id.as_object_id();
        Ok(order)
    }

    async fn orders_for_customer(&self, customer: ObjectId) -> Result<Vec<Order>, AppError> {
        let cursor = self
            .orders()
            .find(doc! { "customer": customer })
            .sort(doc! { "_id": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn all_orders_with_customer(&self) -> Result<Vec<OrderWithCustomer>, AppError> {
        let pipeline = vec![
            doc! { "$sort": { "_id": -1 } },
            doc! { "$lookup": {
                "from": USERS_COLLECTION,
                "localField": "customer",
                "foreignField": "_id",
                "as": "customer_doc",
            } },
            doc! { "$unwind": { "path": "$customer_doc", "preserveNullAndEmptyArrays": true } },
        ];

        let docs: Vec<Document> = self.orders().aggregate(pipeline).await?.try_collect().await?;

        docs.into_iter().map(split_customer).collect()
    }

    async fn set_status(&self, id: ObjectId, status: OrderStatus) -> Result<Option<Order>, AppError> {
        Ok(self
            .orders()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "status": status.as_str() } },
            )
            .return_document(ReturnDocument::After)
            .await?)
    }
}

/// Separates the `$lookup` result from the order fields.
fn split_customer(mut raw: Document) -> Result<OrderWithCustomer, AppError> {
    let customer = match raw.remove("customer_doc") {
        Some(bson::Bson::Document(user)) => {
            let id = user.get_object_id("_id").map(|id| id.to_hex()).unwrap_or_default();
            let mobile = user.get_str("mobile").unwrap_or_default().to_string();
            Some(CustomerSummary { id, mobile })
        }
        _ => None,
    };

    let order: Order = bson::from_document(raw)?;
    Ok(OrderWithCustomer { order, customer })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewOrder;

    fn raw_order(customer: ObjectId) -> Document {
        bson::to_document(&Order::from(NewOrder {
            customer,
            category: "Ironing".into(),
            weight: 2.0,
            photos: vec!["uploads/p.jpg".into()],
            date: "2024-06-01".into(),
            time: "09:30".into(),
        }))
        .unwrap()
    }

    #[test]
    fn test_split_customer_with_match() {
        let user_id = ObjectId::new();
        let mut raw = raw_order(user_id);
        raw.insert("_id", ObjectId::new());
        raw.insert("customer_doc", doc! { "_id": user_id, "mobile": "9999999999" });

        let joined = split_customer(raw).unwrap();
        let customer = joined.customer.unwrap();
        assert_eq!(customer.id, user_id.to_hex());
        assert_eq!(customer.mobile, "9999999999");
        assert_eq!(joined.order.customer, user_id);
    }

    #[test]
    fn test_split_customer_dangling_reference() {
        let mut raw = raw_order(ObjectId::new());
        raw.insert("_id", ObjectId::new());

        let joined = split_customer(raw).unwrap();
        assert!(joined.customer.is_none());
    }

    #[test]
    fn test_split_customer_tolerates_legacy_status() {
        let user_id = ObjectId::new();
        let mut raw = raw_order(user_id);
        raw.insert("_id", ObjectId::new());
        raw.insert("status", "Picked up");
        raw.insert("customer_doc", doc! { "_id": user_id, "mobile": "8888888888" });

        let joined = split_customer(raw).unwrap();
        assert_eq!(joined.order.status, OrderStatus::Pending);
        assert_eq!(joined.customer.unwrap().mobile, "8888888888");
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_set_status_unknown_id() {
        let db = MongoDB::new("mongodb://localhost:27017/pickup_test").await.unwrap();
        let updated = db.set_status(ObjectId::new(), OrderStatus::Completed).await.unwrap();
        assert!(updated.is_none());
    }
}
