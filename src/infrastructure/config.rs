use tracing::warn;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEV_JWT_SECRET: &str = "dev-secret-change-in-production";

/// Process configuration, resolved once at startup from the environment
/// (with `.env` support).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, falling back to the development secret");
            DEV_JWT_SECRET.to_string()
        });

        AppConfig {
            bind_addr,
            jwt_secret,
        }
    }
}
