use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum::{
    extract::{Request, State},
    http::{Method, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use cookie::{Cookie, SameSite};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use uuid::Uuid;

use crate::{
    AppState,
    entities::{staff_session, staff_user},
    error::{AppError, AppResult},
    models::StaffUser,
};

pub const SESSION_COOKIE: &str = "sessionid";
pub const LOGIN_PATH: &str = "/admin/login/";
pub const DEFAULT_NEXT: &str = "/api/v1/movies/";

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("failed to hash password: {e}"))
}

/// Unparseable hashes never match.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok(),
        Err(_) => false,
    }
}

/// Creates the staff account, or resets its password and flags if it exists.
pub async fn ensure_staff_user(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> AppResult<staff_user::Model> {
    let password = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;

    let existing = staff_user::Entity::find()
        .filter(staff_user::Column::Username.eq(username))
        .one(db)
        .await?;

    let user = match existing {
        Some(user) => {
            let mut model = user.into_active_model();
            model.password_hash = Set(password_hash);
            model.is_staff = Set(true);
            model.is_active = Set(true);
            model.update(db).await?
        }
        None => {
            staff_user::ActiveModel {
                id: Set(Uuid::new_v4()),
                username: Set(username.to_string()),
                password_hash: Set(password_hash),
                is_staff: Set(true),
                is_active: Set(true),
                created_at: Set(now_sec()),
            }
            .insert(db)
            .await?
        }
    };

    Ok(user)
}

/// Returns the user only for valid credentials on an active staff account.
pub async fn authenticate(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> AppResult<Option<staff_user::Model>> {
    let Some(user) = staff_user::Entity::find()
        .filter(staff_user::Column::Username.eq(username))
        .one(db)
        .await?
    else {
        return Ok(None);
    };

    if !(user.is_active && user.is_staff) {
        return Ok(None);
    }

    let password = password.to_string();
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await?;

    Ok(valid.then_some(user))
}

pub async fn start_session(
    db: &DatabaseConnection,
    user_id: Uuid,
    ttl_hours: i64,
) -> AppResult<String> {
    let token = Uuid::new_v4().simple().to_string();
    staff_session::ActiveModel {
        token: Set(token.clone()),
        user_id: Set(user_id),
        expires_at: Set(now_sec() + ttl_hours * 3_600),
    }
    .insert(db)
    .await?;
    Ok(token)
}

pub async fn end_session(db: &DatabaseConnection, token: &str) -> AppResult<()> {
    staff_session::Entity::delete_by_id(token.to_string()).exec(db).await?;
    Ok(())
}

/// Resolves a session token to its staff user. Expired sessions, inactive
/// users and non-staff users all resolve to `None`.
pub async fn staff_for_session(
    db: &DatabaseConnection,
    token: &str,
) -> AppResult<Option<StaffUser>> {
    let found = staff_session::Entity::find_by_id(token.to_string())
        .find_also_related(staff_user::Entity)
        .one(db)
        .await?;

    let Some((session, Some(user))) = found else {
        return Ok(None);
    };

    if session.expires_at <= now_sec() {
        tracing::debug!(user = %user.username, "session expired");
        return Ok(None);
    }

    if !(user.is_active && user.is_staff) {
        return Ok(None);
    }

    Ok(Some(StaffUser { id: user.id, username: user.username }))
}

/// Request pipeline for the read API: staff gate first, then GET only.
pub async fn require_staff_get(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let staff = match jar.get(SESSION_COOKIE) {
        Some(cookie) => staff_for_session(&state.db, cookie.value()).await,
        None => Ok(None),
    };

    let user = match staff {
        Ok(Some(user)) => user,
        Ok(None) => return login_redirect(req.uri()),
        Err(err) => return err.into_response(),
    };

    if req.method() != Method::GET {
        return AppError::MethodNotAllowed.into_response();
    }

    req.extensions_mut().insert(user);
    next.run(req).await
}

pub fn session_cookie(token: String, ttl_hours: i64) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::hours(ttl_hours))
        .build()
}

pub fn login_redirect(uri: &Uri) -> Response {
    let next = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or(DEFAULT_NEXT);
    found(&format!("{LOGIN_PATH}?next={}", urlencoding::encode(next)))
}

pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Only same-site absolute paths are honoured as post-login targets.
pub fn safe_next(next: Option<&str>) -> &str {
    match next.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path
        }
        _ => DEFAULT_NEXT,
    }
}

fn now_sec() -> i64 {
    chrono::Utc::now().timestamp()
}
