use crate::{
    database::MongoDB,
    jobs::mail_queue::{MailQueue, QueuedMail},
    models::{ProfileInfo, User},
    services::mailer_service,
    utils::error::AppError,
};
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};
use bcrypt::{hash, verify, DEFAULT_COST};
use jsonwebtoken::{encode, decode, Header, Validation, EncodingKey, DecodingKey, Algorithm};
use chrono::{Utc, Duration};
use uuid::Uuid;
use std::collections::HashSet;
use std::sync::OnceLock;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,           // user_id
    pub email: String,
    pub iat: usize,            // issued at
    pub exp: usize,            // expiration
    pub jti: String,           // JWT ID
    pub aud: String,           // audience
    pub iss: String,           // issuer
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: ProfileInfo,
}

// Session tokens stay valid across restarts, so the signing secret comes
// from configuration and is installed exactly once at startup.
static SIGNING_SECRET: OnceLock<String> = OnceLock::new();

pub fn init_signing_secret(secret: String) {
    let _ = SIGNING_SECRET.set(secret);
}

fn signing_secret() -> Result<&'static str, AppError> {
    SIGNING_SECRET
        .get()
        .map(String::as_str)
        .ok_or_else(|| AppError::Database("session signing secret not initialized".to_string()))
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "roomie-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "roomie-app".to_string())
}

// Generate a session token (1 hour expiry)
pub fn generate_session_token(user: &User) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(1)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: user.user_id.clone(),
        email: user.email.clone(),
        iat,
        exp,
        jti,
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(signing_secret()?.as_ref()),
    )
    .map_err(|e| AppError::Database(format!("Failed to generate token: {}", e)))
}

// Verify a session token
pub fn verify_session(token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(signing_secret()?.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

fn validate_registration(request: &RegisterRequest) -> Result<(), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if request.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }
    Ok(())
}

// User registration: creates an unverified account and queues the
// verification email. Mail problems are logged, never surfaced - the
// account exists either way.
pub async fn register(
    db: &MongoDB,
    queue: &MailQueue,
    request: &RegisterRequest,
) -> Result<RegisterResponse, AppError> {
    validate_registration(request)?;

    let collection = db.collection::<User>("users");

    let existing = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?;

    if existing.is_some() {
        return Err(AppError::Conflict("User already exists".to_string()));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Database(format!("Failed to hash password: {}", e)))?;

    let new_user_id = ObjectId::new().to_hex();
    let verification_token = Uuid::new_v4().simple().to_string();
    let now = BsonDateTime::now();

    let new_user = User {
        _id: None,
        user_id: new_user_id.clone(),
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        password_hash,
        verification_token: Some(verification_token.clone()),
        verified: false,
        gender: None,
        description: None,
        preferences: vec![],
        looking_for: vec![],
        profile_images: vec![],
        liked: vec![],
        received_likes: vec![],
        matches: vec![],
        created_at: Some(now),
        updated_at: Some(now),
    };

    collection
        .insert_one(&new_user)
        .await
        .map_err(|e| AppError::Database(format!("Failed to create user: {}", e)))?;

    log::info!("✅ User registered: {}", new_user.email);

    let (subject, body) =
        mailer_service::verification_email(&mailer_service::public_base_url(), &verification_token);

    let queued = queue
        .enqueue(QueuedMail {
            to: new_user.email.clone(),
            subject,
            body,
        })
        .await;

    if let Err(e) = queued {
        log::error!("❌ Failed to queue verification email for {}: {}", new_user.email, e);
    }

    Ok(RegisterResponse {
        success: true,
        message: "Registration successful".to_string(),
        user_id: new_user_id,
    })
}

// Email verification: single-use token, cleared once consumed
pub async fn verify_email(db: &MongoDB, token: &str) -> Result<(), AppError> {
    let collection = db.collection::<User>("users");

    let result = collection
        .update_one(
            doc! { "verification_token": token },
            doc! {
                "$set": { "verified": true, "updated_at": BsonDateTime::now() },
                "$unset": { "verification_token": "" },
            },
        )
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?;

    if result.matched_count == 0 {
        return Err(AppError::NotFound("Invalid verification token".to_string()));
    }

    Ok(())
}

// User login. Unknown email and wrong password produce the same error -
// the response never tells which one it was.
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<LoginResponse, AppError> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| AppError::Database(format!("Database error: {}", e)))?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let valid = verify(&request.password, &user.password_hash)
        .map_err(|e| AppError::Database(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid email or password".to_string()));
    }

    let token = generate_session_token(&user)?;

    Ok(LoginResponse {
        success: true,
        token,
        user: ProfileInfo::from(user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_test_secret() {
        init_signing_secret("unit-test-secret".to_string());
    }

    fn sample_user() -> User {
        User {
            _id: None,
            user_id: "64f0c0ffee".to_string(),
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: String::new(),
            verification_token: None,
            verified: true,
            gender: None,
            description: None,
            preferences: vec![],
            looking_for: vec![],
            profile_images: vec![],
            liked: vec![],
            received_likes: vec![],
            matches: vec![],
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn session_token_round_trips() {
        init_test_secret();

        let user = sample_user();
        let token = generate_session_token(&user).unwrap();
        let claims = verify_session(&token).unwrap();

        assert_eq!(claims.sub, user.user_id);
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > claims.iat);
        // 1 hour expiry
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn tampered_token_is_rejected() {
        init_test_secret();

        let token = generate_session_token(&sample_user()).unwrap();
        let mut tampered = token.clone();
        // Flip the final signature character
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'a' { 'b' } else { 'a' });

        assert!(verify_session(&tampered).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        init_test_secret();

        let iat = (Utc::now() - Duration::hours(3)).timestamp() as usize;
        let exp = (Utc::now() - Duration::hours(2)).timestamp() as usize;
        let claims = Claims {
            sub: "someone".to_string(),
            email: "someone@example.com".to_string(),
            iat,
            exp,
            jti: Uuid::new_v4().to_string(),
            aud: get_jwt_audience(),
            iss: get_jwt_issuer(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("unit-test-secret".as_ref()),
        )
        .unwrap();

        assert!(verify_session(&token).is_err());
    }

    #[test]
    fn registration_validation() {
        let ok = RegisterRequest {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(validate_registration(&ok).is_ok());

        let no_name = RegisterRequest { name: "  ".to_string(), ..request_like(&ok) };
        assert!(matches!(validate_registration(&no_name), Err(AppError::Validation(_))));

        let bad_email = RegisterRequest { email: "not-an-email".to_string(), ..request_like(&ok) };
        assert!(matches!(validate_registration(&bad_email), Err(AppError::Validation(_))));

        let no_password = RegisterRequest { password: String::new(), ..request_like(&ok) };
        assert!(matches!(validate_registration(&no_password), Err(AppError::Validation(_))));
    }

    fn request_like(r: &RegisterRequest) -> RegisterRequest {
        RegisterRequest {
            name: r.name.clone(),
            email: r.email.clone(),
            password: r.password.clone(),
        }
    }

    #[test]
    fn password_hashes_are_salted_and_verify() {
        let first = hash("hunter2", 4).unwrap();
        let second = hash("hunter2", 4).unwrap();

        assert_ne!(first, second);
        assert!(verify("hunter2", &first).unwrap());
        assert!(verify("hunter2", &second).unwrap());
        assert!(!verify("wrong", &first).unwrap());
    }
}
