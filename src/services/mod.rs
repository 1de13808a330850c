pub mod auth_service;
pub mod health_service;
pub mod post_service;
pub mod user_service;
