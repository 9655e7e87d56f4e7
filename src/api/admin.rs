use actix_web::{web, HttpResponse};

use super::error_response;
use crate::models::{
    AdminOrderResponse, AdminOrdersResponse, OrderEnvelope, OrderResponse, UpdateStatusRequest,
};
use crate::services::admin_service;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    tag = "Admin",
    responses(
        (status = 200, description = "All orders with owner mobile", body = AdminOrdersResponse),
        (status = 401, description = "Admin credentials required (when configured)")
    ),
    security(("basic_auth" = []))
)]
pub async fn list_orders(state: web::Data<AppState>) -> HttpResponse {
    log::info!("🗂️  GET /admin/orders");

    match admin_service::list_all_orders(state.orders.as_ref()).await {
        Ok(orders) => {
            log::info!("✅ Listed {} orders", orders.len());
            HttpResponse::Ok().json(AdminOrdersResponse {
                orders: orders.into_iter().map(AdminOrderResponse::from).collect(),
            })
        }
        Err(e) => error_response("admin/orders", e),
    }
}

#[utoipa::path(
    post,
    path = "/api/admin/order/{order_id}/status",
    tag = "Admin",
    params(("order_id" = String, Path, description = "Order id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderEnvelope),
        (status = 400, description = "Unknown status value or malformed id"),
        (status = 404, description = "Order not found")
    ),
    security(("basic_auth" = []))
)]
pub async fn update_status(
    state: web::Data<AppState>,
    order_id: web::Path<String>,
    request: web::Json<UpdateStatusRequest>,
) -> HttpResponse {
    log::info!("🔧 POST /admin/order/{}/status - status: {}", order_id, request.status);

    match admin_service::set_order_status(state.orders.as_ref(), &order_id, &request.status).await {
        Ok(order) => {
            log::info!("✅ Order {} is now {}", order_id, order.status);
            HttpResponse::Ok().json(OrderEnvelope {
                success: true,
                order: OrderResponse::from(order),
            })
        }
        Err(e) => error_response("admin/order/status", e),
    }
}
