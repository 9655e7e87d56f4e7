use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pickup Service API",
        version = "1.0.0",
        description = "Laundry pickup order management.\n\n**Authentication:** customers log in with a one-time code sent to their mobile number. Admin endpoints accept HTTP Basic credentials when `ADMIN_USERNAME`/`ADMIN_PASSWORD` are configured.\n\n**Uploads:** order photos are served from `/uploads`."
    ),
    paths(
        crate::api::health::health_check,
        crate::api::auth::send_otp,
        crate::api::auth::verify_otp,
        crate::api::orders::create_order,
        crate::api::orders::my_orders,
        crate::api::admin::list_orders,
        crate::api::admin::update_status,
    ),
    components(
        schemas(
            crate::api::health::HealthResponse,
            crate::models::SendOtpRequest,
            crate::models::SendOtpResponse,
            crate::models::VerifyOtpRequest,
            crate::models::VerifyOtpResponse,
            crate::models::CreateOrderForm,
            crate::models::OrderResponse,
            crate::models::OrderEnvelope,
            crate::models::OrdersResponse,
            crate::models::AdminOrderResponse,
            crate::models::AdminOrdersResponse,
            crate::models::CustomerSummary,
            crate::models::OrderStatus,
            crate::models::UpdateStatusRequest,
        )
    ),
    tags(
        (name = "Health", description = "Liveness and database connectivity."),
        (name = "Auth", description = "Mobile number login with one-time codes."),
        (name = "Orders", description = "Customer order submission and history."),
        (name = "Admin", description = "Order overview and status changes."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Basic)
                        .description(Some("Admin username and password"))
                        .build(),
                ),
            );
        }
    }
}
