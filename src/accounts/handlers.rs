use axum::{
    extract::State,
    http::{header::ACCEPT, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, instrument};
use uuid::Uuid;

use crate::{
    accounts::{
        dto::{
            LoginRequest, LoginResponse, PublicUser, SignupRequest, UpdateUserRequest,
            UserEnvelope, VerifyEmailQuery,
        },
        pages::VerificationPage,
        services::{self, VerificationOutcome},
    },
    auth::AuthUser,
    error::{ApiResult, AppJson, AppPath, AppQuery},
    state::AppState,
};

const USER_NOT_FOUND: &str = "User not found";

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/verify-email", get(verify_email))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/users/:user_id", get(get_user).put(update_user))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(payload): AppJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserEnvelope>)> {
    let user = services::register(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(UserEnvelope {
            message: "User registered successfully",
            user: user.into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session = services::authenticate(&state, &payload.email, &payload.password).await?;
    Ok(Json(LoginResponse {
        message: "Login successful",
        token: session.token,
        user_id: session.user_id,
    }))
}

/// Browsers get an HTML page; clients asking for JSON get `{"message"}`.
#[instrument(skip(state, headers, query))]
pub async fn verify_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppQuery(query): AppQuery<VerifyEmailQuery>,
) -> Response {
    let token = query.token.unwrap_or_default();
    let (status, page) = match services::verify_email(&state, &token).await {
        Ok(VerificationOutcome::Verified) => (
            StatusCode::OK,
            VerificationPage::Outcome(VerificationOutcome::Verified),
        ),
        Ok(outcome) => (StatusCode::BAD_REQUEST, VerificationPage::Outcome(outcome)),
        Err(e) => {
            error!(error = %e, "email verification failed");
            (StatusCode::INTERNAL_SERVER_ERROR, VerificationPage::Error)
        }
    };

    let wants_json = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if wants_json {
        (status, Json(json!({ "message": page.message() }))).into_response()
    } else {
        (status, Html(page.render())).into_response()
    }
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(user_id): AppPath<Uuid>,
) -> ApiResult<Json<PublicUser>> {
    auth.ensure_owner(user_id, USER_NOT_FOUND)?;
    let user = services::get_user(&state, user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateUserRequest>,
) -> ApiResult<Json<UserEnvelope>> {
    auth.ensure_owner(user_id, USER_NOT_FOUND)?;
    let user = services::update_user(&state, user_id, payload).await?;
    Ok(Json(UserEnvelope {
        message: "User details updated successfully",
        user: user.into(),
    }))
}
