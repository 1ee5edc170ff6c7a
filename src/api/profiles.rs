use actix_web::{web, HttpResponse};
use crate::{database::MongoDB, services::profile_service};
use crate::services::profile_service::{DiscoveryQuery, ProfilesResponse};

#[utoipa::path(
    get,
    path = "/profiles",
    tag = "Discovery",
    params(DiscoveryQuery),
    responses(
        (status = 200, description = "Candidate profiles for the requesting user", body = ProfilesResponse),
        (status = 404, description = "Requesting user not found")
    )
)]
pub async fn list_profiles(
    db: web::Data<MongoDB>,
    query: web::Query<DiscoveryQuery>,
) -> HttpResponse {
    log::info!("🔍 GET /profiles - userId: {}", query.user_id);

    match profile_service::list_profiles(&db, &query).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Failed to build discovery feed for {}: {}", query.user_id, e);
            e.to_response()
        }
    }
}
