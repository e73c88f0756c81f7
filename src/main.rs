use std::{sync::Arc, time::Duration};

use movie_admin::{AppState, auth, config::Config, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movie_admin=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let db = db::connect_and_migrate(&config).await?;

    if let Some((username, password)) = config.bootstrap_admin() {
        let user = auth::ensure_staff_user(&db, username, password).await?;
        tracing::info!(username = %user.username, "bootstrap staff account ready");
    }

    let state = Arc::new(AppState::new(config.clone(), db));

    // Forget usernames whose login quota has fully replenished.
    let limiter_state = state.clone();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(Duration::from_secs(60));
        loop {
            tick.tick().await;
            limiter_state.login_limiter.retain_recent();
            limiter_state.login_limiter.shrink_to_fit();
        }
    });
    let app = movie_admin::app(state);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
