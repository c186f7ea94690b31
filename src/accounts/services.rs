//! Account Service: registration, email verification, login and profile
//! maintenance.

use rand::{rngs::OsRng, RngCore};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    accounts::{
        dto::{SignupRequest, UpdateUserRequest},
        repo_types::{NewUser, User, UserChanges},
    },
    auth::password::{hash_password, verify_password},
    db::StoreError,
    error::{ApiError, ApiResult},
    state::AppState,
    validation::{is_valid_email, normalize_email, require_fields},
};

const USER_NOT_FOUND: &str = "User not found";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    /// Unknown token and already-used token are reported identically.
    AlreadyVerifiedOrInvalid,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
}

/// 32 random bytes, hex encoded.
pub(crate) fn generate_verification_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn duplicate_as_email_error(e: StoreError) -> ApiError {
    match e {
        StoreError::Duplicate => ApiError::DuplicateEmail,
        other => other.into(),
    }
}

fn checked_email(raw: &str) -> ApiResult<String> {
    let email = normalize_email(raw);
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Invalid email"));
    }
    Ok(email)
}

pub async fn register(state: &AppState, req: SignupRequest) -> ApiResult<User> {
    require_fields(&[
        ("fullName", req.full_name.as_str()),
        ("email", req.email.as_str()),
        ("mobileNumber", req.mobile_number.as_str()),
        ("password", req.password.as_str()),
    ])?;
    let email = checked_email(&req.email)?;

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let password_hash = hash_password(&req.password)?;
    let verification_token = generate_verification_token();
    let user = state
        .users
        .create(&NewUser {
            full_name: req.full_name.trim().to_string(),
            email,
            mobile_number: req.mobile_number.trim().to_string(),
            password_hash,
            verification_token: verification_token.clone(),
        })
        .await
        .map_err(duplicate_as_email_error)?;

    // The row is durable at this point; a mail failure must not undo signup.
    let link = format!(
        "{}/verify-email?token={}",
        state.config.public_base_url, verification_token
    );
    if let Err(e) = state.mailer.send_verification(&user.email, &link).await {
        warn!(error = %e, user_id = %user.id, "verification email not sent");
    }

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(user)
}

pub async fn verify_email(state: &AppState, token: &str) -> ApiResult<VerificationOutcome> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(VerificationOutcome::AlreadyVerifiedOrInvalid);
    }
    match state.users.consume_verification_token(token).await? {
        Some(user) => {
            info!(user_id = %user.id, "email verified");
            Ok(VerificationOutcome::Verified)
        }
        None => Ok(VerificationOutcome::AlreadyVerifiedOrInvalid),
    }
}

/// Verification status does not gate login.
pub async fn authenticate(state: &AppState, email: &str, password: &str) -> ApiResult<Session> {
    require_fields(&[("email", email), ("password", password)])?;
    let email = normalize_email(email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !verify_password(password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let token = state.jwt.sign(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(Session {
        token,
        user_id: user.id,
    })
}

pub async fn get_user(state: &AppState, user_id: Uuid) -> ApiResult<User> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))
}

pub async fn update_user(
    state: &AppState,
    user_id: Uuid,
    req: UpdateUserRequest,
) -> ApiResult<User> {
    let email = match req.email.required_text("email")? {
        Some(raw) => Some(checked_email(&raw)?),
        None => None,
    };
    let password_hash = match req.password.required_text("password")? {
        Some(plain) => Some(hash_password(&plain)?),
        None => None,
    };
    let changes = UserChanges {
        full_name: req
            .full_name
            .required_text("fullName")?
            .map(|v| v.trim().to_string()),
        email,
        mobile_number: req
            .mobile_number
            .required_text("mobileNumber")?
            .map(|v| v.trim().to_string()),
        password_hash,
    };

    let user = state
        .users
        .update(user_id, &changes)
        .await
        .map_err(duplicate_as_email_error)?
        .ok_or(ApiError::NotFound(USER_NOT_FOUND))?;

    info!(%user_id, password_changed = changes.password_hash.is_some(), "user updated");
    Ok(user)
}
