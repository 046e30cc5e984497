//! User repository for operator accounts.

use async_trait::async_trait;
use domain::models::User;
use domain::stores::{StoreResult, UserStore};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::UserEntity;
use crate::error::map_sqlx_error;
use crate::metrics::QueryTimer;

/// Repository for user database operations.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Creates a new UserRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let timer = QueryTimer::new("find_user_by_email");

        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, name, password_hash, is_active, created_at
            FROM users
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        Ok(result.map_err(map_sqlx_error)?.map(User::from))
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let timer = QueryTimer::new("find_user_by_id");

        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, email, name, password_hash, is_active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        timer.record();
        Ok(result.map_err(map_sqlx_error)?.map(User::from))
    }
}
