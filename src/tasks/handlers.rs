use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{ApiResult, AppJson, AppPath},
    state::AppState,
    tasks::{
        dto::{Ack, AddTodoRequest, TodoEnvelope, TodoResponse, UpdateTodoRequest},
        repo_types::Task,
        services::{self, TODO_NOT_FOUND},
    },
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/add-todo", post(add_todo))
        .route("/todos/:user_id", get(list_todos))
        .route("/todos/:user_id/date/:date", get(list_todos_by_date))
        .route(
            "/todos/:user_id/:todo_id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
}

fn to_responses(tasks: Vec<Task>) -> Vec<TodoResponse> {
    tasks.into_iter().map(TodoResponse::from).collect()
}

#[instrument(skip(state, payload))]
pub async fn add_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(payload): AppJson<AddTodoRequest>,
) -> ApiResult<(StatusCode, Json<TodoEnvelope>)> {
    let task = services::add_task(&state, auth, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(TodoEnvelope {
            message: "Todo added successfully",
            todo: task.into(),
        }),
    ))
}

#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(user_id): AppPath<Uuid>,
) -> ApiResult<Json<Vec<TodoResponse>>> {
    auth.ensure_owner(user_id, TODO_NOT_FOUND)?;
    let tasks = services::list_tasks(&state, user_id).await?;
    Ok(Json(to_responses(tasks)))
}

#[instrument(skip(state))]
pub async fn list_todos_by_date(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((user_id, date)): AppPath<(Uuid, String)>,
) -> ApiResult<Json<Vec<TodoResponse>>> {
    auth.ensure_owner(user_id, TODO_NOT_FOUND)?;
    let tasks = services::list_tasks_by_date(&state, user_id, &date).await?;
    Ok(Json(to_responses(tasks)))
}

#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((user_id, todo_id)): AppPath<(Uuid, Uuid)>,
) -> ApiResult<Json<TodoResponse>> {
    auth.ensure_owner(user_id, TODO_NOT_FOUND)?;
    let task = services::get_task(&state, user_id, todo_id).await?;
    Ok(Json(task.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((user_id, todo_id)): AppPath<(Uuid, Uuid)>,
    AppJson(payload): AppJson<UpdateTodoRequest>,
) -> ApiResult<Json<TodoEnvelope>> {
    auth.ensure_owner(user_id, TODO_NOT_FOUND)?;
    let task = services::update_task(&state, user_id, todo_id, payload).await?;
    Ok(Json(TodoEnvelope {
        message: "Todo updated successfully",
        todo: task.into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath((user_id, todo_id)): AppPath<(Uuid, Uuid)>,
) -> ApiResult<Json<Ack>> {
    auth.ensure_owner(user_id, TODO_NOT_FOUND)?;
    services::delete_task(&state, user_id, todo_id).await?;
    Ok(Json(Ack {
        message: "Todo deleted successfully",
    }))
}
