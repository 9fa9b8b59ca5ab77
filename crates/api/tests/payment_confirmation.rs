//! Slot purchases confirmed through the PostgreSQL session store.

use std::sync::Arc;

use igeco_api::sessions::{PgSessionStore, RecordPayment, SessionQuotaManager};
use igeco_db::models::user::{CreateUser, UpdateQuotas, User};
use igeco_db::repositories::UserRepo;
use sqlx::PgPool;

async fn create_user(pool: &PgPool, username: &str, max_sessions: i32) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@igeco.test"),
        password_hash: "unused".to_string(),
        role: "exhibitor".to_string(),
        max_sessions,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

fn pending(payment_id: &str, slots: i32) -> RecordPayment {
    RecordPayment {
        payment_id: payment_id.to_string(),
        slots,
        amount_paid: "15.00".to_string(),
        currency: "EUR".to_string(),
        status: "PENDING".to_string(),
    }
}

fn manager(pool: &PgPool) -> SessionQuotaManager {
    SessionQuotaManager::new(Arc::new(PgSessionStore::new(pool.clone())))
}

#[sqlx::test(migrations = "../db/migrations")]
async fn confirming_two_pending_purchases_adds_both(pool: PgPool) {
    let user = create_user(&pool, "twobuys", 3).await;
    let manager = manager(&pool);
    manager.record_payment(user.id, pending("PAY-A", 2)).await.unwrap();
    manager.record_payment(user.id, pending("PAY-B", 2)).await.unwrap();

    manager.confirm_payment("PAY-A").await.unwrap();
    let second = manager.confirm_payment("PAY-B").await.unwrap();

    assert_eq!((second.previous_limit, second.new_limit), (5, 7));
    assert_eq!(UserRepo::max_sessions(&pool, user.id).await.unwrap(), Some(7));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn confirmation_after_admin_change_builds_on_it(pool: PgPool) {
    let user = create_user(&pool, "adminraised", 3).await;
    let manager = manager(&pool);
    manager.record_payment(user.id, pending("PAY-C", 1)).await.unwrap();

    UserRepo::update_quotas(
        &pool,
        user.id,
        &UpdateQuotas {
            max_sessions: Some(10),
            max_exhibitors: None,
        },
    )
    .await
    .unwrap();

    let applied = manager.confirm_payment("PAY-C").await.unwrap();
    assert_eq!((applied.previous_limit, applied.new_limit), (10, 11));

    // A repeated confirmation does not add the slot again.
    manager.confirm_payment("PAY-C").await.unwrap();
    assert_eq!(UserRepo::max_sessions(&pool, user.id).await.unwrap(), Some(11));
}
