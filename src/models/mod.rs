pub mod user;
pub mod outbound_email;

pub use user::*;
pub use outbound_email::*;
