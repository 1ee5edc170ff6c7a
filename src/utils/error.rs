use actix_web::HttpResponse;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Database(String),
    Mail(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Validation(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Database(msg) => write!(f, "Database error: {}", msg),
            AppError::Mail(msg) => write!(f, "Mail error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Validation(msg) => write!(f, "Invalid request: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Maps the error to its HTTP response. Store and mail failures
    /// surface as a generic 500; the message never includes internals
    /// beyond what the variant carries.
    pub fn to_response(&self) -> HttpResponse {
        let body = |msg: &str| {
            serde_json::json!({
                "success": false,
                "message": msg,
            })
        };

        match self {
            AppError::NotFound(msg) => HttpResponse::NotFound().json(body(msg)),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(body(msg)),
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(body(msg)),
            AppError::Validation(msg) => HttpResponse::BadRequest().json(body(msg)),
            AppError::Database(_) | AppError::Mail(_) => {
                HttpResponse::InternalServerError().json(body("Internal server error"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn maps_variants_to_status_codes() {
        assert_eq!(
            AppError::NotFound("user".into()).to_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("exists".into()).to_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Unauthorized("creds".into()).to_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Validation("empty".into()).to_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database("down".into()).to_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_prefixes_variant() {
        assert_eq!(
            AppError::NotFound("User not found".into()).to_string(),
            "Not found: User not found"
        );
        assert_eq!(
            AppError::Database("connection refused".into()).to_string(),
            "Database error: connection refused"
        );
    }
}
