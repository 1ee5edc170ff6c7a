use actix_web::{web, HttpResponse};
use crate::{database::MongoDB, jobs::mail_queue::MailQueue, services::auth_service};
use crate::services::auth_service::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

#[utoipa::path(
    post,
    path = "/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "User already exists")
    )
)]
pub async fn register(
    db: web::Data<MongoDB>,
    queue: web::Data<MailQueue>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    log::info!("📝 POST /register - email: {}", request.email);

    match auth_service::register(&db, &queue, &request).await {
        Ok(response) => {
            log::info!("✅ Registration successful: {}", request.email);
            HttpResponse::Created().json(response)
        }
        Err(e) => {
            log::warn!("❌ Registration failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/verify/{token}",
    tag = "Auth",
    params(("token" = String, Path, description = "Verification token from the email link")),
    responses(
        (status = 200, description = "Email verified"),
        (status = 404, description = "Invalid verification token")
    )
)]
pub async fn verify(db: web::Data<MongoDB>, token: web::Path<String>) -> HttpResponse {
    log::info!("📨 GET /verify");

    match auth_service::verify_email(&db, &token).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Email verified successfully",
        })),
        Err(e) => {
            log::warn!("❌ Email verification failed: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(db: web::Data<MongoDB>, request: web::Json<LoginRequest>) -> HttpResponse {
    log::info!("🔐 POST /login - email: {}", request.email);

    match auth_service::login(&db, &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}
