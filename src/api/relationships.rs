use actix_web::{web, HttpResponse};
use crate::{database::MongoDB, services::relationship_service};
use crate::services::relationship_service::{MatchesResponse, PairRequest, ReceivedLikesResponse};

#[utoipa::path(
    post,
    path = "/send-like",
    tag = "Relationships",
    request_body = PairRequest,
    responses(
        (status = 200, description = "Like recorded"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Users are already matched")
    )
)]
pub async fn send_like(db: web::Data<MongoDB>, request: web::Json<PairRequest>) -> HttpResponse {
    log::info!(
        "💌 POST /send-like - {} -> {}",
        request.current_user_id,
        request.selected_user_id
    );

    match relationship_service::send_like(&db, &request.current_user_id, &request.selected_user_id)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Like sent successfully",
        })),
        Err(e) => {
            log::warn!("❌ Failed to send like: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/create-match",
    tag = "Relationships",
    request_body = PairRequest,
    responses(
        (status = 200, description = "Match created"),
        (status = 404, description = "User not found"),
        (status = 409, description = "No pending like, or already matched")
    )
)]
pub async fn create_match(db: web::Data<MongoDB>, request: web::Json<PairRequest>) -> HttpResponse {
    log::info!(
        "💞 POST /create-match - {} accepts {}",
        request.current_user_id,
        request.selected_user_id
    );

    match relationship_service::create_match(
        &db,
        &request.current_user_id,
        &request.selected_user_id,
    )
    .await
    {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Match created successfully",
        })),
        Err(e) => {
            log::warn!("❌ Failed to create match: {}", e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/received-likes/{user_id}/details",
    tag = "Relationships",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Profiles of users with a pending like", body = ReceivedLikesResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn received_likes(db: web::Data<MongoDB>, user_id: web::Path<String>) -> HttpResponse {
    log::info!("📥 GET /received-likes/{}/details", user_id);

    match relationship_service::list_received_likes(&db, &user_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Failed to list received likes for {}: {}", user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/matches",
    tag = "Relationships",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "Profiles of matched users", body = MatchesResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn matches(db: web::Data<MongoDB>, user_id: web::Path<String>) -> HttpResponse {
    log::info!("💑 GET /users/{}/matches", user_id);

    match relationship_service::list_matches(&db, &user_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Failed to list matches for {}: {}", user_id, e);
            e.to_response()
        }
    }
}
