#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use chrono::{NaiveDate, Utc};
use movie_admin::{
    AppState, auth,
    config::Config,
    db,
    entities::{
        film_work, film_work_type, genre, genre_film_work, person,
        person_film_work::{self, PersonRole},
        staff_session, staff_user,
    },
};
use sea_orm::{DatabaseConnection, DbErr, EntityTrait, Set};
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("response body should be JSON")
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn location(&self) -> &str {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok()).unwrap_or_default()
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_env(&[]).await
    }

    pub async fn with_env(overrides: &[(&str, &str)]) -> Self {
        let config = Config::from_lookup(|key| {
            overrides
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
                .or_else(|| match key {
                    "DATABASE_URL" => Some("sqlite::memory:".to_string()),
                    "LOGIN_RPS" => Some("1000".to_string()),
                    _ => None,
                })
        })
        .unwrap();
        let config = Arc::new(config);

        let db = db::connect_and_migrate(&config).await.unwrap();
        let state = Arc::new(AppState::new(config, db.clone()));
        Self { router: movie_admin::app(state), db }
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec();
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(request("GET", uri, token)).await
    }

    /// A session for a fresh active staff account.
    pub async fn staff_token(&self) -> String {
        let user_id = insert_user(&self.db, true, true).await;
        auth::start_session(&self.db, user_id, 1).await.unwrap()
    }
}

pub fn request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("{}={token}", auth::SESSION_COOKIE));
    }
    builder.body(Body::empty()).unwrap()
}

/// Inserts a user whose password can never verify.
pub async fn insert_user(db: &DatabaseConnection, is_staff: bool, is_active: bool) -> Uuid {
    let id = Uuid::new_v4();
    staff_user::Entity::insert(staff_user::ActiveModel {
        id: Set(id),
        username: Set(format!("user-{}", id.simple())),
        password_hash: Set("!".to_string()),
        is_staff: Set(is_staff),
        is_active: Set(is_active),
        created_at: Set(Utc::now().timestamp()),
    })
    .exec(db)
    .await
    .unwrap();
    id
}

pub async fn insert_session(db: &DatabaseConnection, user_id: Uuid, expires_at: i64) -> String {
    let token = Uuid::new_v4().simple().to_string();
    staff_session::Entity::insert(staff_session::ActiveModel {
        token: Set(token.clone()),
        user_id: Set(user_id),
        expires_at: Set(expires_at),
    })
    .exec(db)
    .await
    .unwrap();
    token
}

pub fn new_film(title: &str) -> film_work::ActiveModel {
    let now = Utc::now();
    film_work::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title.to_string()),
        description: Set(String::new()),
        creation_date: Set(None),
        certificate: Set(String::new()),
        file_path: Set(String::new()),
        rating: Set(None),
        film_type: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub async fn insert_film(db: &DatabaseConnection, film: film_work::ActiveModel) -> Uuid {
    let id = film.id.clone().unwrap();
    film_work::Entity::insert(film).exec(db).await.unwrap();
    id
}

pub async fn film(db: &DatabaseConnection, title: &str) -> Uuid {
    insert_film(db, new_film(title)).await
}

pub async fn film_type(db: &DatabaseConnection, slug: &str, name: &str) {
    let now = Utc::now();
    film_work_type::Entity::insert(film_work_type::ActiveModel {
        slug: Set(slug.to_string()),
        name: Set(name.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    })
    .exec(db)
    .await
    .unwrap();
}

pub async fn genre(db: &DatabaseConnection, name: &str) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    genre::Entity::insert(genre::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        description: Set(String::new()),
        created_at: Set(now),
        updated_at: Set(now),
    })
    .exec(db)
    .await
    .unwrap();
    id
}

pub async fn person(db: &DatabaseConnection, full_name: &str) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    person::Entity::insert(person::ActiveModel {
        id: Set(id),
        full_name: Set(full_name.to_string()),
        birth_date: Set(NaiveDate::from_ymd_opt(1970, 1, 1)),
        created_at: Set(now),
        updated_at: Set(now),
    })
    .exec(db)
    .await
    .unwrap();
    id
}

pub async fn try_credit(
    db: &DatabaseConnection,
    film: Uuid,
    person: Uuid,
    role: PersonRole,
) -> Result<(), DbErr> {
    person_film_work::Entity::insert(person_film_work::ActiveModel {
        id: Set(Uuid::new_v4()),
        film_work_id: Set(film),
        person_id: Set(person),
        role: Set(role),
        created_at: Set(Utc::now()),
    })
    .exec(db)
    .await
    .map(|_| ())
}

pub async fn credit(db: &DatabaseConnection, film: Uuid, person: Uuid, role: PersonRole) {
    try_credit(db, film, person, role).await.unwrap();
}

pub async fn try_tag(db: &DatabaseConnection, film: Uuid, genre: Uuid) -> Result<(), DbErr> {
    genre_film_work::Entity::insert(genre_film_work::ActiveModel {
        id: Set(Uuid::new_v4()),
        film_work_id: Set(film),
        genre_id: Set(genre),
        created_at: Set(Utc::now()),
    })
    .exec(db)
    .await
    .map(|_| ())
}

pub async fn tag(db: &DatabaseConnection, film: Uuid, genre: Uuid) {
    try_tag(db, film, genre).await.unwrap();
}
