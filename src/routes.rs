use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use cookie::Cookie;
use uuid::Uuid;

use crate::{
    AppState, auth,
    error::{AppError, AppResult},
    models::{LoginRequest, Movie, MoviePage, NextQuery, PageQuery, StaffUser},
    templates,
};

const BAD_CREDENTIALS: &str =
    "Please enter the correct username and password for a staff account.";

pub async fn movies(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<StaffUser>,
    Query(params): Query<Vec<(String, String)>>,
) -> AppResult<Json<MoviePage>> {
    let q = PageQuery::from_pairs(params);
    let page = state.catalog.list(q.page.as_deref()).await?;
    tracing::debug!(
        staff = %user.username,
        count = page.count,
        returned = page.results.len(),
        "listed movies"
    );
    Ok(Json(page))
}

pub async fn movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<Movie>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::not_found("no film found matching the query"))?;
    Ok(Json(state.catalog.movie(id).await?))
}

pub async fn login_form(Query(q): Query<NextQuery>) -> Html<String> {
    Html(templates::login_page(auth::safe_next(q.next.as_deref()), None))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(req): Form<LoginRequest>,
) -> AppResult<Response> {
    let username = req.username.trim();
    if state.login_limiter.check_key(&username.to_string()).is_err() {
        tracing::warn!(%username, "login throttled");
        return Err(AppError::TooManyRequests);
    }
    let next = auth::safe_next(req.next.as_deref());

    let Some(user) = auth::authenticate(&state.db, username, &req.password).await? else {
        tracing::info!(%username, "rejected staff login");
        return Ok(Html(templates::login_page(next, Some(BAD_CREDENTIALS))).into_response());
    };

    let ttl_hours = state.config.session_ttl_hours;
    let token = auth::start_session(&state.db, user.id, ttl_hours).await?;
    tracing::info!(username = %user.username, "staff login");

    Ok((jar.add(auth::session_cookie(token, ttl_hours)), auth::found(next)).into_response())
}

pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> AppResult<Response> {
    if let Some(cookie) = jar.get(auth::SESSION_COOKIE) {
        auth::end_session(&state.db, cookie.value()).await?;
    }

    let jar = jar.remove(Cookie::build(auth::SESSION_COOKIE).path("/"));
    Ok((jar, auth::found(auth::LOGIN_PATH)).into_response())
}
