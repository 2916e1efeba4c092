use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, DeleteAccountRequest, LoginRequest, RegisterRequest, UpdateProfileRequest},
    extractors::{AuthRejection, AuthUser},
    jwt::TokenError,
    password,
    repo::StoreError,
    repo_types::{User, UserChanges},
    validation::{validate_password, validate_username},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UsernameTaken => AppError::Conflict("Username already exists".into()),
            StoreError::Database(e) => AppError::Internal(e),
        }
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".into())
}

pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<AuthResponse> {
    let username = req.username.trim().to_owned();
    validate_username(&username)?;
    validate_password(&req.password)?;

    let hash = password::hash(req.password).await?;
    let user = state
        .users
        .create_user(&username, &hash)
        .await
        .map_err(|e| {
            if matches!(e, StoreError::UsernameTaken) {
                warn!(%username, "username already registered");
            }
            AppError::from(e)
        })?;

    let token = state.jwt.sign(&user)?;
    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok(AuthResponse { user, token })
}

/// Unknown username and wrong password produce the same error.
pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<AuthResponse> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }

    let Some(creds) = state.users.find_by_username(username).await? else {
        warn!(%username, "login unknown username");
        password::verify_dummy(req.password).await?;
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    };

    if !password::verify(req.password, creds.password_hash.clone()).await? {
        warn!(user_id = %creds.id, "login invalid password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
    }

    let user = User::from(creds);
    let token = state.jwt.sign(&user)?;
    info!(user_id = %user.id, "user logged in");
    Ok(AuthResponse { user, token })
}

/// Resolves a bearer token to a live identity. The username comes from the
/// store, not the claim, so renamed accounts keep their sessions.
pub async fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, AuthRejection> {
    let claims = state.jwt.decode(token).map_err(|e| {
        warn!(reason = %e, "token rejected");
        AuthRejection::Token(e)
    })?;

    match state.users.find_by_id(claims.sub).await {
        Ok(Some(user)) => Ok(AuthUser {
            id: user.id,
            username: user.username,
        }),
        Ok(None) => {
            warn!(user_id = %claims.sub, "token subject no longer exists");
            Err(AuthRejection::Token(TokenError::SubjectNotFound))
        }
        Err(e) => Err(AuthRejection::Internal(e.into())),
    }
}

pub async fn me(state: &AppState, user_id: Uuid) -> AppResult<User> {
    state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(user_not_found)
}

async fn check_current_password(
    state: &AppState,
    user_id: Uuid,
    plain: String,
    wrong: &str,
) -> AppResult<()> {
    let hash = state
        .users
        .password_hash(user_id)
        .await?
        .ok_or_else(user_not_found)?;
    if !password::verify(plain, hash).await? {
        warn!(%user_id, "current password mismatch");
        return Err(AppError::Unauthorized(wrong.into()));
    }
    Ok(())
}

pub async fn update_profile(
    state: &AppState,
    auth: &AuthUser,
    req: UpdateProfileRequest,
) -> AppResult<User> {
    let username = req
        .username
        .map(|u| u.trim().to_owned())
        .filter(|u| !u.is_empty());
    let new_password = req.new_password.filter(|p| !p.is_empty());
    let current_password = req.current_password.filter(|p| !p.is_empty());

    if username.is_none() && new_password.is_none() {
        return Err(AppError::Validation("No changes provided".into()));
    }

    let current = me(state, auth.id).await?;
    let mut changes = UserChanges::default();

    if let Some(name) = username.filter(|n| *n != current.username) {
        validate_username(&name)?;
        changes.username = Some(name);
    }

    if let Some(new_password) = new_password {
        let Some(current_password) = current_password else {
            return Err(AppError::Validation(
                "Current password is required to change password".into(),
            ));
        };
        check_current_password(
            state,
            auth.id,
            current_password,
            "Current password is incorrect",
        )
        .await?;
        validate_password(&new_password)?;
        changes.password_hash = Some(password::hash(new_password).await?);
    }

    if changes.is_empty() {
        return Err(AppError::Validation("No changes provided".into()));
    }

    let renamed = changes.username.is_some();
    let rotated = changes.password_hash.is_some();
    let user = state
        .users
        .update(auth.id, changes)
        .await
        .map_err(|e| match e {
            StoreError::UsernameTaken => AppError::Conflict("Username already taken".into()),
            other => other.into(),
        })?
        .ok_or_else(user_not_found)?;

    info!(user_id = %user.id, renamed, rotated, "profile updated");
    Ok(user)
}

pub async fn delete_account(
    state: &AppState,
    auth: &AuthUser,
    req: DeleteAccountRequest,
) -> AppResult<()> {
    let Some(password) = req.password.filter(|p| !p.is_empty()) else {
        return Err(AppError::Validation(
            "Password is required to delete account".into(),
        ));
    };
    check_current_password(state, auth.id, password, "Password is incorrect").await?;

    if !state.users.delete(auth.id).await? {
        return Err(user_not_found());
    }
    info!(user_id = %auth.id, "account deleted");
    Ok(())
}
