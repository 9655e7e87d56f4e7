use actix_web::{web, HttpResponse};

use super::error_response;
use crate::models::{SendOtpRequest, SendOtpResponse, VerifyOtpRequest, VerifyOtpResponse};
use crate::services::auth_service;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/send-otp",
    tag = "Auth",
    request_body = SendOtpRequest,
    responses(
        (status = 200, description = "OTP issued", body = SendOtpResponse),
        (status = 400, description = "Missing mobile number")
    )
)]
pub async fn send_otp(
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    log::info!("📲 POST /auth/send-otp - mobile: {}", request.mobile);

    match auth_service::send_otp(state.users.as_ref(), &request.mobile).await {
        Ok(otp) => {
            log::info!("✅ OTP issued for {}", request.mobile);
            HttpResponse::Ok().json(SendOtpResponse {
                message: "OTP sent successfully".to_string(),
                otp: state.config.otp_in_response.then_some(otp),
            })
        }
        Err(e) => error_response("send-otp", e),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    tag = "Auth",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "OTP accepted", body = VerifyOtpResponse),
        (status = 400, description = "Invalid or expired OTP")
    )
)]
pub async fn verify_otp(
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    log::info!("🔐 POST /auth/verify-otp - mobile: {}", request.mobile);

    match auth_service::verify_otp(state.users.as_ref(), &request.mobile, &request.otp).await {
        Ok(user_id) => {
            log::info!("✅ OTP verified for {} (user {})", request.mobile, user_id);
            HttpResponse::Ok().json(VerifyOtpResponse {
                success: true,
                user_id,
            })
        }
        Err(e) => error_response("verify-otp", e),
    }
}
