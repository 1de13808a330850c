pub mod auth_session;
pub mod post;
pub mod token;
pub mod user;
