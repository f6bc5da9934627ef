use crate::auth::jwt::JwtConfig;

/// Runtime configuration for the API server, read from the
/// environment. Defaults favor local development; production deploys
/// set everything explicitly.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated in `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    pub jwt: JwtConfig,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `CORS_ORIGINS`, `REQUEST_TIMEOUT_SECS`,
    /// and the JWT settings. Panics on unparseable values so a bad
    /// deployment fails before binding the socket.
    pub fn from_env() -> Self {
        let port: u16 = env_or("PORT", &DEFAULT_PORT.to_string())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", DEFAULT_CORS_ORIGIN)
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host: env_or("HOST", DEFAULT_HOST),
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
        }
    }
}
