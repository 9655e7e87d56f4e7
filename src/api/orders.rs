use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};

use super::error_response;
use crate::models::{CreateOrderForm, OrderEnvelope, OrderResponse, OrdersResponse};
use crate::services::{order_service, upload_service};
use crate::state::AppState;

/// POST /api/order/new - Creates an order with up to 5 photos (multipart)
#[utoipa::path(
    post,
    path = "/api/order/new",
    tag = "Orders",
    request_body(content = CreateOrderForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Order created", body = OrderEnvelope),
        (status = 400, description = "Missing fields, no photos or too many photos")
    )
)]
pub async fn create_order(state: web::Data<AppState>, payload: Multipart) -> HttpResponse {
    log::info!("🧺 POST /order/new");

    let form = match upload_service::parse_multipart(
        payload,
        &state.config.upload_dir,
        &order_service::PHOTO_RULES,
    )
    .await
    {
        Ok(form) => form,
        Err(e) => return error_response("order/new", e),
    };

    match order_service::create_order(state.users.as_ref(), state.orders.as_ref(), form).await {
        Ok(order) => {
            log::info!(
                "✅ Order created: {} ({} photos)",
                order.id.map(|id| id.to_hex()).unwrap_or_default(),
                order.photos.len()
            );
            HttpResponse::Ok().json(OrderEnvelope {
                success: true,
                order: OrderResponse::from(order),
            })
        }
        Err(e) => error_response("order/new", e),
    }
}

/// GET /api/order/my-orders/{user_id} - Order history for one user, newest first
#[utoipa::path(
    get,
    path = "/api/order/my-orders/{user_id}",
    tag = "Orders",
    params(("user_id" = String, Path, description = "User id returned by verify-otp")),
    responses(
        (status = 200, description = "User's orders, newest first", body = OrdersResponse),
        (status = 400, description = "Malformed user id")
    )
)]
pub async fn my_orders(state: web::Data<AppState>, user_id: web::Path<String>) -> HttpResponse {
    log::info!("📋 GET /order/my-orders/{}", user_id);

    match order_service::list_orders(state.orders.as_ref(), &user_id).await {
        Ok(orders) => {
            log::info!("✅ Listed {} orders for {}", orders.len(), user_id);
            HttpResponse::Ok().json(OrdersResponse {
                orders: orders.into_iter().map(OrderResponse::from).collect(),
            })
        }
        Err(e) => error_response("order/my-orders", e),
    }
}
