mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::*;
use movie_admin::{auth, entities::staff_user};
use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};

fn login_request(form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/admin/login/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn session_token(res: &TestResponse) -> Option<String> {
    res.headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| cookie::Cookie::parse(v.to_string()).ok())
        .find(|c| c.name() == auth::SESSION_COOKIE && !c.value().is_empty())
        .map(|c| c.value().to_string())
}

#[tokio::test]
async fn login_form_carries_next() {
    let app = TestApp::new().await;
    let res = app.get("/admin/login/?next=%2Fapi%2Fv1%2Fmovies%2F%3Fpage%3D3", None).await;
    assert_eq!(res.status, StatusCode::OK);
    let html = res.text();
    assert!(html.contains("name=\"next\""));
    assert!(html.contains("/api/v1/movies/?page=3"));
}

#[tokio::test]
async fn staff_login_then_logout() {
    let app = TestApp::new().await;
    auth::ensure_staff_user(&app.db, "editor", "s3cret-pass").await.unwrap();
    film(&app.db, "Playtime").await;

    let res = app.send(login_request("username=editor&password=wrong&next=%2F")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.text().contains("correct username and password"));
    assert!(session_token(&res).is_none());

    let res = app
        .send(login_request(
            "username=editor&password=s3cret-pass&next=%2Fapi%2Fv1%2Fmovies%2F%3Fpage%3D1",
        ))
        .await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), "/api/v1/movies/?page=1");
    let token = session_token(&res).expect("session cookie");

    let res = app.get("/api/v1/movies/", Some(&token)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["count"], 1);

    let res = app.send(request("POST", "/admin/logout/", Some(&token))).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), auth::LOGIN_PATH);

    let res = app.get("/api/v1/movies/", Some(&token)).await;
    assert_eq!(res.status, StatusCode::FOUND);
}

#[tokio::test]
async fn login_ignores_offsite_next_and_rejects_non_staff() {
    let app = TestApp::new().await;
    let user = auth::ensure_staff_user(&app.db, "editor", "s3cret-pass").await.unwrap();

    let res = app
        .send(login_request(
            "username=editor&password=s3cret-pass&next=https%3A%2F%2Fevil.example%2F",
        ))
        .await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert_eq!(res.location(), auth::DEFAULT_NEXT);

    let mut demoted = user.into_active_model();
    demoted.is_staff = Set(false);
    demoted.update(&app.db).await.unwrap();

    let res = app.send(login_request("username=editor&password=s3cret-pass")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(session_token(&res).is_none());
}

#[tokio::test]
async fn ensure_staff_user_resets_existing_account() {
    let app = TestApp::new().await;
    let first = auth::ensure_staff_user(&app.db, "editor", "one").await.unwrap();

    let mut disabled = first.clone().into_active_model();
    disabled.is_active = Set(false);
    disabled.update(&app.db).await.unwrap();

    let second = auth::ensure_staff_user(&app.db, "editor", "two").await.unwrap();
    assert_eq!(second.id, first.id);
    assert!(second.is_active && second.is_staff);
    assert!(auth::verify_password("two", &second.password_hash));
    assert!(!auth::verify_password("one", &second.password_hash));

    let by_name: Option<staff_user::Model> =
        auth::authenticate(&app.db, "editor", "two").await.unwrap();
    assert_eq!(by_name.map(|u| u.id), Some(first.id));
}

#[tokio::test]
async fn login_attempts_are_throttled() {
    let app = TestApp::with_env(&[("LOGIN_RPS", "1")]).await;

    let res = app.send(login_request("username=nobody&password=x")).await;
    assert_eq!(res.status, StatusCode::OK);

    let res = app.send(login_request("username=nobody&password=x")).await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);

    // Another account keeps its own quota.
    auth::ensure_staff_user(&app.db, "editor", "s3cret-pass").await.unwrap();
    let res = app.send(login_request("username=editor&password=s3cret-pass")).await;
    assert_eq!(res.status, StatusCode::FOUND);
    assert!(session_token(&res).is_some());
}
