use std::net::SocketAddr;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Shared secret expected as `Authorization: Bearer <secret>` on score webhooks.
    pub webhook_secret: Option<String>,
    pub listen_addr: SocketAddr,
    pub max_connections: u32,
    pub migrate_on_startup: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://leaderboard.db?mode=rwc".to_string());

        let webhook_secret = std::env::var("WEBHOOK_SECRET")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = match std::env::var("PORT") {
            Ok(p) => p.parse().context("PORT must be a valid u16")?,
            Err(_) => 8000,
        };
        let listen_addr: SocketAddr = format!("{host}:{port}")
            .parse()
            .with_context(|| format!("invalid listen address {host}:{port}"))?;

        let max_connections: u32 = match std::env::var("MAX_DB_CONNECTIONS") {
            Ok(n) => n.parse().context("MAX_DB_CONNECTIONS must be a positive integer")?,
            Err(_) => 10,
        };

        let migrate_on_startup = std::env::var("DB_MIGRATE_ON_STARTUP")
            .map(|v| !is_disabled(&v))
            .unwrap_or(true);

        Ok(Config {
            database_url,
            webhook_secret,
            listen_addr,
            max_connections,
            migrate_on_startup,
        })
    }

    pub fn uses_sqlite(&self) -> bool {
        self.database_url.starts_with("sqlite:")
    }
}

fn is_disabled(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off")
}
