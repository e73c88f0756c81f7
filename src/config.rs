use std::net::SocketAddr;

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,
    /// PostgreSQL schema holding the content tables. Ignored on SQLite.
    pub content_schema: String,
    pub session_ttl_hours: i64,
    pub login_rps: u32,
    pub admin_username: Option<String>,
    pub admin_password: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 =
            lookup("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://movie_admin.db?mode=rwc".to_string());

        let content_schema = lookup("CONTENT_SCHEMA").unwrap_or_else(|| "content".to_string());
        if !is_identifier(&content_schema) {
            anyhow::bail!("CONTENT_SCHEMA must be a plain SQL identifier, got {content_schema:?}");
        }

        let session_ttl_hours: i64 =
            lookup("SESSION_TTL_HOURS").and_then(|s| s.parse().ok()).unwrap_or(24 * 14);

        let login_rps: u32 = lookup("LOGIN_RPS").and_then(|s| s.parse().ok()).unwrap_or(5);

        let admin_username = lookup("ADMIN_USERNAME").filter(|s| !s.trim().is_empty());
        let admin_password = lookup("ADMIN_PASSWORD").filter(|s| !s.is_empty());

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            database_url,
            content_schema,
            session_ttl_hours,
            login_rps,
            admin_username,
            admin_password,
        })
    }

    /// Credentials for the bootstrap staff account, when both halves are configured.
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (&self.admin_username, &self.admin_password) {
            (Some(user), Some(pass)) => Some((user.trim(), pass.as_str())),
            _ => None,
        }
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
