use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{patch::Patch, tasks::repo_types::Task};

/// Request body for `POST /add-todo`. `userId` stays a string so a malformed
/// id is reported as a field error, not a JSON error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddTodoRequest {
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub user_id: String,
}

/// Request body for `PUT /todos/:userId/:todoId`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTodoRequest {
    pub title: Patch<String>,
    pub description: Patch<String>,
    pub date: Patch<String>,
    pub time: Patch<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(with = "time::serde::rfc3339")]
    pub due_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Task> for TodoResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            user_id: t.user_id,
            title: t.title,
            description: t.description,
            due_at: t.due_at,
            created_at: t.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TodoEnvelope {
    pub message: &'static str,
    pub todo: TodoResponse,
}

#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: &'static str,
}
