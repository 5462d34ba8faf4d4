//! Integration tests for the notification repository.

use concierge_db::models::notification::CreateNotification;
use concierge_db::models::user::CreateUser;
use concierge_db::repositories::{NotificationRepo, UserRepo};
use sqlx::PgPool;
use uuid::Uuid;

async fn seed_user(pool: &PgPool, email: &str) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: "$argon2id$fake-hash-for-tests".to_string(),
            confirmation_token: Uuid::new_v4().to_string(),
            profile: serde_json::json!({}),
        },
    )
    .await
    .expect("user creation should succeed");
    user.id
}

fn notify(user_id: i64, title: &str) -> CreateNotification {
    CreateNotification {
        user_id,
        title: title.to_string(),
        body: None,
    }
}

/// Listing filters by read state and is scoped to the owning user.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_for_user_filters(pool: PgPool) {
    let alice = seed_user(&pool, "alice@test.com").await;
    let bob = seed_user(&pool, "bob@test.com").await;

    let n1 = NotificationRepo::create(&pool, &notify(alice, "first"))
        .await
        .expect("create should succeed");
    NotificationRepo::create(&pool, &notify(alice, "second"))
        .await
        .expect("create should succeed");
    NotificationRepo::create(&pool, &notify(bob, "other user"))
        .await
        .expect("create should succeed");

    NotificationRepo::mark_read(&pool, n1.id, alice)
        .await
        .expect("mark_read should succeed");

    let all = NotificationRepo::list_for_user(&pool, alice, None)
        .await
        .expect("list should succeed");
    assert_eq!(all.len(), 2, "bob's notification must not leak into alice's list");

    let unread = NotificationRepo::list_for_user(&pool, alice, Some(false))
        .await
        .expect("list should succeed");
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].title, "second");

    let read = NotificationRepo::list_for_user(&pool, alice, Some(true))
        .await
        .expect("list should succeed");
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].id, n1.id);
}

/// mark_read is scoped by user and reports whether a row changed.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_read_scoping(pool: PgPool) {
    let alice = seed_user(&pool, "alice@test.com").await;
    let bob = seed_user(&pool, "bob@test.com").await;

    let n = NotificationRepo::create(&pool, &notify(alice, "hers"))
        .await
        .expect("create should succeed");

    // Bob cannot mark alice's notification.
    let changed = NotificationRepo::mark_read(&pool, n.id, bob)
        .await
        .expect("mark_read should succeed");
    assert!(!changed);

    let changed = NotificationRepo::mark_read(&pool, n.id, alice)
        .await
        .expect("mark_read should succeed");
    assert!(changed);

    // Already read: no further rows affected.
    let changed = NotificationRepo::mark_read(&pool, n.id, alice)
        .await
        .expect("mark_read should succeed");
    assert!(!changed);

    let row = &NotificationRepo::list_for_user(&pool, alice, None)
        .await
        .expect("list should succeed")[0];
    assert!(row.read);
    assert!(row.read_at.is_some());
}

/// unread_count tracks mark_read.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unread_count(pool: PgPool) {
    let alice = seed_user(&pool, "alice@test.com").await;

    let n1 = NotificationRepo::create(&pool, &notify(alice, "one"))
        .await
        .expect("create should succeed");
    NotificationRepo::create(&pool, &notify(alice, "two"))
        .await
        .expect("create should succeed");

    assert_eq!(
        NotificationRepo::unread_count(&pool, alice)
            .await
            .expect("count should succeed"),
        2
    );

    NotificationRepo::mark_read(&pool, n1.id, alice)
        .await
        .expect("mark_read should succeed");

    assert_eq!(
        NotificationRepo::unread_count(&pool, alice)
            .await
            .expect("count should succeed"),
        1
    );
}
