use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    accounts::repo_types::{NewUser, User, UserChanges},
    db::StoreResult,
};

const USER_COLUMNS: &str = "id, full_name, email, mobile_number, password_hash, verified, \
                            verification_token, created_at, updated_at";

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the email is taken.
    async fn create(&self, new_user: &NewUser) -> StoreResult<User>;

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// `email` must already be normalized.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Marks the holder of `token` verified and clears the token in one write.
    /// `None` when no user holds it.
    async fn consume_verification_token(&self, token: &str) -> StoreResult<Option<User>>;

    /// `None` when the user does not exist.
    async fn update(&self, id: Uuid, changes: &UserChanges) -> StoreResult<Option<User>>;
}

#[derive(Clone)]
pub struct PgUserRepo {
    db: PgPool,
}

impl PgUserRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, new_user: &NewUser) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (full_name, email, mobile_number, password_hash, verification_token)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&new_user.full_name)
        .bind(&new_user.email)
        .bind(&new_user.mobile_number)
        .bind(&new_user.password_hash)
        .bind(&new_user.verification_token)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn consume_verification_token(&self, token: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET verified = TRUE, verification_token = NULL, updated_at = now()
             WHERE verification_token = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(token)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
               SET full_name     = COALESCE($2, full_name),
                   email         = COALESCE($3, email),
                   mobile_number = COALESCE($4, mobile_number),
                   password_hash = COALESCE($5, password_hash),
                   updated_at    = now()
             WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.full_name)
        .bind(&changes.email)
        .bind(&changes.mobile_number)
        .bind(&changes.password_hash)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }
}
