mod api;
mod database;
mod jobs;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::env;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    // Get configuration from environment
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("PORT").unwrap_or_else(|_| "4000".to_string());
    let database_url = env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set");

    // The signing secret has to survive restarts or every session dies
    // with the process
    let jwt_secret = env::var("JWT_SECRET")
        .expect("JWT_SECRET must be set");
    services::auth_service::init_signing_secret(jwt_secret);

    log::info!("🚀 Starting Roomie Service...");
    log::info!("📊 Database: {}", database_url);

    // Initialize MongoDB connection
    let db = database::MongoDB::new(&database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db_data = web::Data::new(db.clone());

    log::info!("✅ MongoDB connected successfully");

    // Mail relay + background delivery worker
    let mailer = services::mailer_service::MailerClient::from_env()
        .expect("Mail relay must be configured (MAIL_RELAY_URL, MAIL_RELAY_TOKEN, MAIL_FROM)");
    let mail_queue = web::Data::new(jobs::mail_queue::MailQueue::start(db.clone(), mailer));

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    // Start HTTP server
    HttpServer::new(move || {
        // Mobile clients call from arbitrary origins
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(mail_queue.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone())
            )
            // Health check
            .route("/health", web::get().to(api::health::health_check))
            // Registration & auth
            .route("/register", web::post().to(api::auth::register))
            .route("/verify/{token}", web::get().to(api::auth::verify))
            .route("/login", web::post().to(api::auth::login))
            // Discovery feed
            .route("/profiles", web::get().to(api::profiles::list_profiles))
            // Like / match workflow
            .route("/send-like", web::post().to(api::relationships::send_like))
            .route("/create-match", web::post().to(api::relationships::create_match))
            .route(
                "/received-likes/{user_id}/details",
                web::get().to(api::relationships::received_likes),
            )
            // Profile attributes
            .service(
                web::scope("/users")
                    .route("/{user_id}/gender", web::put().to(api::users::set_gender))
                    .route("/{user_id}/description", web::put().to(api::users::set_description))
                    .route("/{user_id}/preferences/add", web::put().to(api::users::add_preference))
                    .route("/{user_id}/preferences/remove", web::put().to(api::users::remove_preference))
                    .route("/{user_id}/looking-for", web::put().to(api::users::add_looking_for))
                    .route("/{user_id}/looking-for/remove", web::put().to(api::users::remove_looking_for))
                    .route("/{user_id}/profile-images", web::post().to(api::users::add_profile_image))
                    .route("/{user_id}/matches", web::get().to(api::relationships::matches))
                    // catch-all, must stay last
                    .route("/{user_id}", web::get().to(api::users::get_user))
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
