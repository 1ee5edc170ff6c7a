use actix_web::{web, HttpResponse};
use crate::{database::MongoDB, services::user_service};
use crate::models::ProfileInfo;
use crate::services::user_service::{
    AddImageRequest, LookingForRequest, PreferenceRequest, SetDescriptionRequest, SetGenderRequest,
};

fn ack(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": message,
    }))
}

#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile", body = ProfileInfo),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(db: web::Data<MongoDB>, user_id: web::Path<String>) -> HttpResponse {
    log::info!("👤 GET /users/{}", user_id);

    match user_service::get_user(&db, &user_id).await {
        Ok(profile) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "user": profile,
        })),
        Err(e) => {
            log::warn!("❌ Failed to fetch user {}: {}", user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/users/{user_id}/gender",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = SetGenderRequest,
    responses(
        (status = 200, description = "Gender updated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_gender(
    db: web::Data<MongoDB>,
    user_id: web::Path<String>,
    request: web::Json<SetGenderRequest>,
) -> HttpResponse {
    log::info!("✏️  PUT /users/{}/gender", user_id);

    match user_service::set_gender(&db, &user_id, &request.gender).await {
        Ok(()) => ack("User gender updated successfully"),
        Err(e) => {
            log::warn!("❌ Failed to update gender for {}: {}", user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/users/{user_id}/description",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = SetDescriptionRequest,
    responses(
        (status = 200, description = "Description updated"),
        (status = 404, description = "User not found")
    )
)]
pub async fn set_description(
    db: web::Data<MongoDB>,
    user_id: web::Path<String>,
    request: web::Json<SetDescriptionRequest>,
) -> HttpResponse {
    log::info!("✏️  PUT /users/{}/description", user_id);

    match user_service::set_description(&db, &user_id, &request.description).await {
        Ok(()) => ack("User description updated successfully"),
        Err(e) => {
            log::warn!("❌ Failed to update description for {}: {}", user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/users/{user_id}/preferences/add",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = PreferenceRequest,
    responses(
        (status = 200, description = "Preference added"),
        (status = 404, description = "User not found")
    )
)]
pub async fn add_preference(
    db: web::Data<MongoDB>,
    user_id: web::Path<String>,
    request: web::Json<PreferenceRequest>,
) -> HttpResponse {
    log::info!("➕ PUT /users/{}/preferences/add", user_id);

    match user_service::add_preference(&db, &user_id, &request.preferences).await {
        Ok(()) => ack("Preference added successfully"),
        Err(e) => {
            log::warn!("❌ Failed to add preference for {}: {}", user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/users/{user_id}/preferences/remove",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = PreferenceRequest,
    responses(
        (status = 200, description = "Preference removed"),
        (status = 404, description = "User not found")
    )
)]
pub async fn remove_preference(
    db: web::Data<MongoDB>,
    user_id: web::Path<String>,
    request: web::Json<PreferenceRequest>,
) -> HttpResponse {
    log::info!("➖ PUT /users/{}/preferences/remove", user_id);

    match user_service::remove_preference(&db, &user_id, &request.preferences).await {
        Ok(()) => ack("Preference removed successfully"),
        Err(e) => {
            log::warn!("❌ Failed to remove preference for {}: {}", user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/users/{user_id}/looking-for",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = LookingForRequest,
    responses(
        (status = 200, description = "Looking-for tag added"),
        (status = 404, description = "User not found")
    )
)]
pub async fn add_looking_for(
    db: web::Data<MongoDB>,
    user_id: web::Path<String>,
    request: web::Json<LookingForRequest>,
) -> HttpResponse {
    log::info!("➕ PUT /users/{}/looking-for", user_id);

    match user_service::add_looking_for(&db, &user_id, &request.looking_for).await {
        Ok(()) => ack("Looking for updated successfully"),
        Err(e) => {
            log::warn!("❌ Failed to add looking-for tag for {}: {}", user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    put,
    path = "/users/{user_id}/looking-for/remove",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = LookingForRequest,
    responses(
        (status = 200, description = "Looking-for tag removed"),
        (status = 404, description = "User not found")
    )
)]
pub async fn remove_looking_for(
    db: web::Data<MongoDB>,
    user_id: web::Path<String>,
    request: web::Json<LookingForRequest>,
) -> HttpResponse {
    log::info!("➖ PUT /users/{}/looking-for/remove", user_id);

    match user_service::remove_looking_for(&db, &user_id, &request.looking_for).await {
        Ok(()) => ack("Looking for updated successfully"),
        Err(e) => {
            log::warn!("❌ Failed to remove looking-for tag for {}: {}", user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/profile-images",
    tag = "Users",
    params(("user_id" = String, Path, description = "User id")),
    request_body = AddImageRequest,
    responses(
        (status = 200, description = "Image appended"),
        (status = 400, description = "Invalid image URL"),
        (status = 404, description = "User not found")
    )
)]
pub async fn add_profile_image(
    db: web::Data<MongoDB>,
    user_id: web::Path<String>,
    request: web::Json<AddImageRequest>,
) -> HttpResponse {
    log::info!("🖼️  POST /users/{}/profile-images", user_id);

    match user_service::add_profile_image(&db, &user_id, &request.image_url).await {
        Ok(()) => ack("Image has been added"),
        Err(e) => {
            log::warn!("❌ Failed to add profile image for {}: {}", user_id, e);
            e.to_response()
        }
    }
}
