use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::{ApiError, ApiResult},
    state::AppState,
    tasks::{
        dto::{AddTodoRequest, UpdateTodoRequest},
        due,
        repo_types::{NewTask, Task, TaskChanges},
    },
    validation::require_fields,
};

pub(crate) const TODO_NOT_FOUND: &str = "Todo not found";

/// Creates a task for the `userId` named in the body, which must be the
/// caller. A bad date/time combination is rejected before anything is stored.
pub async fn add_task(state: &AppState, caller: AuthUser, req: AddTodoRequest) -> ApiResult<Task> {
    require_fields(&[
        ("title", req.title.as_str()),
        ("description", req.description.as_str()),
        ("date", req.date.as_str()),
        ("time", req.time.as_str()),
        ("userId", req.user_id.as_str()),
    ])?;
    let owner = Uuid::parse_str(req.user_id.trim())
        .map_err(|_| ApiError::validation("Invalid user ID format"))?;
    caller.ensure_owner(owner, TODO_NOT_FOUND)?;

    let Some(due_at) = due::due_instant(&req.date, &req.time) else {
        warn!(date = %req.date, time = %req.time, "rejected due date/time");
        return Err(ApiError::InvalidDateTime);
    };

    let task = state
        .tasks
        .insert(&NewTask {
            user_id: owner,
            title: req.title,
            description: req.description,
            due_at,
        })
        .await?;
    info!(task_id = %task.id, user_id = %owner, "task created");
    Ok(task)
}

pub async fn list_tasks(state: &AppState, owner: Uuid) -> ApiResult<Vec<Task>> {
    Ok(state.tasks.list_by_owner(owner).await?)
}

/// Tasks due on `date` (`YYYY-MM-DD`), using UTC day boundaries.
pub async fn list_tasks_by_date(state: &AppState, owner: Uuid, date: &str) -> ApiResult<Vec<Task>> {
    let day = due::parse_date(date).ok_or_else(|| ApiError::validation("Invalid date format"))?;
    let (from, until) = due::day_bounds(day);
    Ok(state.tasks.list_due_between(owner, from, until).await?)
}

pub async fn get_task(state: &AppState, owner: Uuid, task_id: Uuid) -> ApiResult<Task> {
    state
        .tasks
        .find(owner, task_id)
        .await?
        .ok_or(ApiError::NotFound(TODO_NOT_FOUND))
}

/// `date` and `time` may arrive alone; the other half comes from the stored
/// due instant.
pub async fn update_task(
    state: &AppState,
    owner: Uuid,
    task_id: Uuid,
    req: UpdateTodoRequest,
) -> ApiResult<Task> {
    let title = req.title.required_text("title")?;
    let description = req.description.required_text("description")?;
    let date = req.date.required("date")?;
    let time = req.time.required("time")?;

    let due_at = if date.is_none() && time.is_none() {
        None
    } else {
        let current = get_task(state, owner, task_id).await?.due_at;
        let day = match date {
            Some(raw) => due::parse_date(&raw).ok_or(ApiError::InvalidDateTime)?,
            None => current.date(),
        };
        let clock = match time {
            Some(raw) => due::parse_time(&raw).ok_or(ApiError::InvalidDateTime)?,
            None => current.time(),
        };
        Some(due::combine(day, clock))
    };

    let task = state
        .tasks
        .update(
            owner,
            task_id,
            &TaskChanges {
                title,
                description,
                due_at,
            },
        )
        .await?
        .ok_or(ApiError::NotFound(TODO_NOT_FOUND))?;
    info!(%task_id, user_id = %owner, "task updated");
    Ok(task)
}

pub async fn delete_task(state: &AppState, owner: Uuid, task_id: Uuid) -> ApiResult<()> {
    if !state.tasks.delete(owner, task_id).await? {
        return Err(ApiError::NotFound(TODO_NOT_FOUND));
    }
    info!(%task_id, user_id = %owner, "task deleted");
    Ok(())
}
