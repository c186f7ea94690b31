use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    db::StoreResult,
    tasks::repo_types::{NewTask, Task, TaskChanges},
};

/// Every read and write is keyed by owner as well as task id; a task held
/// by someone else behaves exactly like one that does not exist.
#[async_trait]
pub trait TaskRepo: Send + Sync {
    async fn insert(&self, new_task: &NewTask) -> StoreResult<Task>;

    /// Ordered by due instant, then creation time.
    async fn list_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Task>>;

    /// Tasks with `from <= due_at < until`.
    async fn list_due_between(
        &self,
        owner: Uuid,
        from: OffsetDateTime,
        until: OffsetDateTime,
    ) -> StoreResult<Vec<Task>>;

    async fn find(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Task>>;

    async fn update(&self, owner: Uuid, id: Uuid, changes: &TaskChanges)
        -> StoreResult<Option<Task>>;

    /// `true` when a row was removed.
    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct PgTaskRepo {
    db: PgPool,
}

impl PgTaskRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskRepo for PgTaskRepo {
    async fn insert(&self, new_task: &NewTask) -> StoreResult<Task> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, due_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, title, description, due_at, created_at
            "#,
        )
        .bind(new_task.user_id)
        .bind(&new_task.title)
        .bind(&new_task.description)
        .bind(new_task.due_at)
        .fetch_one(&self.db)
        .await?;
        Ok(task)
    }

    async fn list_by_owner(&self, owner: Uuid) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_at, created_at
              FROM tasks
             WHERE user_id = $1
             ORDER BY due_at, created_at
            "#,
        )
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn list_due_between(
        &self,
        owner: Uuid,
        from: OffsetDateTime,
        until: OffsetDateTime,
    ) -> StoreResult<Vec<Task>> {
        let rows = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_at, created_at
              FROM tasks
             WHERE user_id = $1 AND due_at >= $2 AND due_at < $3
             ORDER BY due_at, created_at
            "#,
        )
        .bind(owner)
        .bind(from)
        .bind(until)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_at, created_at
              FROM tasks
             WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(task)
    }

    async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        changes: &TaskChanges,
    ) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
               SET title       = COALESCE($3, title),
                   description = COALESCE($4, description),
                   due_at      = COALESCE($5, due_at)
             WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, title, description, due_at, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.due_at)
        .fetch_optional(&self.db)
        .await?;
        Ok(task)
    }

    async fn delete(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
