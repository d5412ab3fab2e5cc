use serde::Deserialize;

/// Built-in administrator account settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub enabled: bool,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub admin: AdminConfig,
    pub plate_service_base_url: String,
    pub plate_service_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let admin = AdminConfig {
            enabled: std::env::var("PARALLAX_ADMIN_ENABLED")
                .ok()
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(true),
            email: std::env::var("PARALLAX_ADMIN_EMAIL")
                .unwrap_or_else(|_| "admin@parallax.local".into()),
            password: std::env::var("PARALLAX_ADMIN_PASSWORD")
                .unwrap_or_else(|_| "Admin1234!".into()),
        };
        Ok(Self {
            host: std::env::var("PARALLAX_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("PARALLAX_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(8080),
            admin,
            plate_service_base_url: std::env::var("PARALLAX_PLATE_SERVICE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            plate_service_timeout_secs: std::env::var("PARALLAX_PLATE_SERVICE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(10),
        })
    }
}
