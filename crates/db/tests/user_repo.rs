//! Database-level tests for the user repository, focused on the quota
//! counter semantics.

use imagia_db::models::user::CreateUser;
use imagia_db::repositories::UserRepo;
use sqlx::PgPool;

fn test_user(nickname: &str, quota: i32) -> CreateUser {
    CreateUser {
        phone: format!("6001{:05}", nickname.len()),
        nickname: nickname.to_string(),
        email: format!("{nickname}@test.com"),
        plan: "FREE".to_string(),
        remaining_quota: quota,
        password_hash: "$argon2id$fake".to_string(),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_and_find(pool: PgPool) {
    let user = UserRepo::create(&pool, &test_user("ana", 20)).await.unwrap();
    assert_eq!(user.plan, "FREE");
    assert_eq!(user.remaining_quota, 20);
    assert!(user.api_token.is_none());

    let found = UserRepo::find_by_nickname(&pool, "ana").await.unwrap();
    assert_eq!(found.unwrap().id, user.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_consume_quota_decrements_to_zero_then_stops(pool: PgPool) {
    let user = UserRepo::create(&pool, &test_user("bo", 2)).await.unwrap();

    let first = UserRepo::consume_quota(&pool, user.id).await.unwrap();
    assert_eq!(first.unwrap().remaining_quota, 1);

    let second = UserRepo::consume_quota(&pool, user.id).await.unwrap();
    assert_eq!(second.unwrap().remaining_quota, 0);

    // Exhausted: the conditional UPDATE matches no row and the counter
    // must stay at zero.
    let third = UserRepo::consume_quota(&pool, user.id).await.unwrap();
    assert!(third.is_none());

    let reread = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reread.remaining_quota, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_consume_quota_unknown_user(pool: PgPool) {
    let result = UserRepo::consume_quota(&pool, 9999).await.unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_plan_resets_counter(pool: PgPool) {
    let user = UserRepo::create(&pool, &test_user("cara", 20)).await.unwrap();
    UserRepo::consume_quota(&pool, user.id).await.unwrap();

    let updated = UserRepo::update_plan(&pool, user.id, "PREMIUM", 40)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.plan, "PREMIUM");
    assert_eq!(updated.remaining_quota, 40);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_set_token_is_one_shot(pool: PgPool) {
    let user = UserRepo::create(&pool, &test_user("dani", 20)).await.unwrap();

    assert!(UserRepo::set_token(&pool, user.id, "token-a").await.unwrap());
    // Second transition must be rejected: the token is already set.
    assert!(!UserRepo::set_token(&pool, user.id, "token-b").await.unwrap());

    let reread = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(reread.api_token.as_deref(), Some("token-a"));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unique_constraints(pool: PgPool) {
    UserRepo::create(&pool, &test_user("eva", 20)).await.unwrap();

    let mut dup = test_user("eva2", 20);
    dup.nickname = "eva".to_string();
    dup.phone = "600999999".to_string();
    dup.email = "other@test.com".to_string();

    let err = UserRepo::create(&pool, &dup).await.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_users_nickname"));
        }
        other => panic!("expected unique violation, got {other}"),
    }
}
