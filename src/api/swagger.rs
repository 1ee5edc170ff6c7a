use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roomie Service API",
        version = "1.0.0",
        description = "Matchmaking backend: registration with email verification, login, profile attributes, discovery feed and the like/match workflow.",
        contact(
            name = "Roomie Service Team",
            email = "support@roomie-service.com"
        )
    ),
    paths(
        // Auth
        crate::api::auth::register,
        crate::api::auth::verify,
        crate::api::auth::login,

        // Health
        crate::api::health::health_check,

        // Users
        crate::api::users::get_user,
        crate::api::users::set_gender,
        crate::api::users::set_description,
        crate::api::users::add_preference,
        crate::api::users::remove_preference,
        crate::api::users::add_looking_for,
        crate::api::users::remove_looking_for,
        crate::api::users::add_profile_image,

        // Discovery
        crate::api::profiles::list_profiles,

        // Relationships
        crate::api::relationships::send_like,
        crate::api::relationships::create_match,
        crate::api::relationships::received_likes,
        crate::api::relationships::matches,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::RegisterResponse,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::LoginResponse,

            // Users
            crate::models::ProfileInfo,
            crate::services::user_service::SetGenderRequest,
            crate::services::user_service::SetDescriptionRequest,
            crate::services::user_service::PreferenceRequest,
            crate::services::user_service::LookingForRequest,
            crate::services::user_service::AddImageRequest,

            // Discovery
            crate::services::profile_service::ProfilesResponse,

            // Relationships
            crate::services::relationship_service::PairRequest,
            crate::services::relationship_service::ReceivedLikesResponse,
            crate::services::relationship_service::MatchesResponse,

            // Health
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, email verification and login."),
        (name = "Health", description = "Health check endpoint for monitoring service status."),
        (name = "Users", description = "Profile attribute management: gender, description, preferences, looking-for tags and profile images."),
        (name = "Discovery", description = "Candidate feed excluding the requester and already-interacted users."),
        (name = "Relationships", description = "Like and match workflow: send likes, accept them into matches, list both."),
    )
)]
pub struct ApiDoc;
