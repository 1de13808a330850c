use inkwell_server::domain::user::ProfileUpdate;
use inkwell_server::error::AppError;
use inkwell_server::storage::UserStore;

mod common;

use common::TestServices;

async fn registered(s: &TestServices) -> i64 {
    s.auth_service.register("writer", "writer@example.com", "password123").await.unwrap();
    s.auth_service.login("writer@example.com", "password123").await.unwrap().user.id
}

#[tokio::test]
async fn test_update_returns_the_stored_row() {
    let s = TestServices::new();
    let id = registered(&s).await;
    let before = s.users.find_by_id(id).await.unwrap().unwrap();

    let update = ProfileUpdate { name: Some("  Ada  ".into()), username: "ada".into(), bio: Some(" \n\t ".into()) };
    let returned = s.user_service.update_profile(id, "writer", update).await.unwrap();

    let stored = s.users.find_by_id(id).await.unwrap().unwrap();
    assert_eq!(returned, stored);
    assert_eq!(stored.name.as_deref(), Some("Ada"));
    assert_eq!(stored.bio, None);
    assert!(stored.updated_at > before.updated_at);
}

#[tokio::test]
async fn test_update_profile_of_someone_else() {
    let s = TestServices::new();
    registered(&s).await;
    s.auth_service.register("other", "other@example.com", "password123").await.unwrap();
    let other = s.users.find_by_username("other").await.unwrap().unwrap();

    let update = ProfileUpdate { name: None, username: "writer".into(), bio: Some("mine now".into()) };
    let result = s.user_service.update_profile(other.id, "writer", update).await;

    assert!(matches!(result, Err(AppError::Forbidden)));
    assert_eq!(s.users.find_by_username("writer").await.unwrap().unwrap().bio, None);
}

#[tokio::test]
async fn test_update_store_failure_is_internal() {
    let s = TestServices::new();
    let id = registered(&s).await;
    s.users.set_unavailable(true);

    let update = ProfileUpdate { name: None, username: "writer".into(), bio: None };
    let result = s.user_service.update_profile(id, "writer", update).await;

    assert!(matches!(result, Err(AppError::Internal { .. })));
}
