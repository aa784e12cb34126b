use std::env;

use crate::domain::StatusPolicy;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub status_policy: StatusPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET is not set"))?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let status_policy = match env::var("ORDER_STATUS_POLICY") {
            Ok(value) => value.parse()?,
            Err(_) => StatusPolicy::default(),
        };
        Ok(Self {
            database_url,
            host,
            port,
            jwt_secret,
            status_policy,
        })
    }
}
