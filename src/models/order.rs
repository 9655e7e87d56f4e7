use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ORDERS_COLLECTION: &str = "orders";

/// Maximum number of photos accepted per order.
pub const MAX_ORDER_PHOTOS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, utoipa::ToSchema)]
pub enum OrderStatus {
    #[default]
    Pending,
    Scheduled,
    Completed,
    Rejected,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Scheduled => "Scheduled",
            OrderStatus::Completed => "Completed",
            OrderStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Scheduled" => Ok(OrderStatus::Scheduled),
            "Completed" => Ok(OrderStatus::Completed),
            "Rejected" => Ok(OrderStatus::Rejected),
            other => Err(format!("Invalid status: {}", other)),
        }
    }
}

/// Pickup order as stored in MongoDB.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Owning user
    pub customer: ObjectId,

    pub category: String,
    pub weight: f64,

    /// Stored file paths, in upload order
    pub photos: Vec<String>,

    pub date: String,
    pub time: String,

    #[serde(default, deserialize_with = "status_or_pending")]
    pub status: OrderStatus,

    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<BsonDateTime>,
}

/// Stored documents may carry status strings written before the status set
/// was fixed. Those read back as `Pending` instead of failing the whole listing.
fn status_or_pending<'de, D>(deserializer: D) -> Result<OrderStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match Option::<String>::deserialize(deserializer)? {
        Some(raw) => raw,
        None => return Ok(OrderStatus::Pending),
    };
    Ok(raw.parse().unwrap_or_else(|e| {
        log::warn!("⚠️  {} in stored order, reading it as Pending", e);
        OrderStatus::Pending
    }))
}

/// Validated input for a new order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: ObjectId,
    pub category: String,
    pub weight: f64,
    pub photos: Vec<String>,
    pub date: String,
    pub time: String,
}

impl From<NewOrder> for Order {
    fn from(n: NewOrder) -> Self {
        Order {
            id: None,
            customer: n.customer,
            category: n.category,
            weight: n.weight,
            photos: n.photos,
            date: n.date,
            time: n.time,
            status: OrderStatus::Pending,
            created_at: Some(BsonDateTime::now()),
        }
    }
}

/// Owner summary embedded in admin listings.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CustomerSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub mobile: String,
}

/// Order joined with its owner's mobile number.
#[derive(Debug, Clone)]
pub struct OrderWithCustomer {
    pub order: Order,
    pub customer: Option<CustomerSummary>,
}

/// Order as returned by the API (ids as hex strings).
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub customer: String,
    pub category: String,
    pub weight: f64,
    pub photos: Vec<String>,
    pub date: String,
    pub time: String,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        OrderResponse {
            id: o.id.map(|id| id.to_hex()).unwrap_or_default(),
            customer: o.customer.to_hex(),
            category: o.category,
            weight: o.weight,
            photos: o.photos,
            date: o.date,
            time: o.time,
            status: o.status,
            created_at: o.created_at.and_then(|d| d.try_to_rfc3339_string().ok()),
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrderResponse {
    #[serde(rename = "_id")]
    pub id: String,
    /// `null` when the owning user no longer resolves
    pub customer: Option<CustomerSummary>,
    pub category: String,
    pub weight: f64,
    pub photos: Vec<String>,
    pub date: String,
    pub time: String,
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<OrderWithCustomer> for AdminOrderResponse {
    fn from(joined: OrderWithCustomer) -> Self {
        let o = joined.order;
        AdminOrderResponse {
            id: o.id.map(|id| id.to_hex()).unwrap_or_default(),
            customer: joined.customer,
            category: o.category,
            weight: o.weight,
            photos: o.photos,
            date: o.date,
            time: o.time,
            status: o.status,
            created_at: o.created_at.and_then(|d| d.try_to_rfc3339_string().ok()),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OrderEnvelope {
    pub success: bool,
    pub order: OrderResponse,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AdminOrdersResponse {
    pub orders: Vec<AdminOrderResponse>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// Multipart form accepted by `POST /api/order/new` (documentation only).
#[allow(dead_code)]
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderForm {
    pub user_id: String,
    pub category: String,
    pub weight: f64,
    pub date: String,
    pub time: String,
    #[schema(value_type = Vec<String>, format = Binary)]
    pub photos: Vec<Vec<u8>>,
}
