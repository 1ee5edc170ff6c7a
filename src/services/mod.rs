pub mod auth_service;
pub mod user_service;
pub mod profile_service;
pub mod relationship_service;
pub mod mailer_service;

pub use user_service::*;
pub use profile_service::*;
pub use relationship_service::*;
pub use mailer_service::*;
