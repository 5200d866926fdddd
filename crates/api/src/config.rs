use imagia_core::plan::PlanQuotas;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base URL of the Ollama generation server.
    pub ollama_url: String,
    /// Base URL of the SMS gateway; `None` disables outbound SMS.
    pub sms_api_url: Option<String>,
    /// Model used when a prompt submission names none.
    pub default_model: String,
    /// Per-plan quota ceilings.
    pub quotas: PlanQuotas,
    /// Minutes a pending verification code stays valid.
    pub verification_ttl_mins: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                       |
    /// |--------------------------|-------------------------------|
    /// | `HOST`                   | `0.0.0.0`                     |
    /// | `PORT`                   | `3000`                        |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`       |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                          |
    /// | `OLLAMA_API_URL`         | `http://127.0.0.1:11434`      |
    /// | `SMS_API_URL`            | unset (SMS disabled)          |
    /// | `DEFAULT_MODEL`          | `llama3.2-vision:latest`      |
    /// | `QUOTA_FREE`             | `20`                          |
    /// | `QUOTA_PREMIUM`          | `40`                          |
    /// | `QUOTA_ADMINISTRATOR`    | `1000000`                     |
    /// | `VERIFICATION_TTL_MINS`  | `10`                          |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let ollama_url =
            std::env::var("OLLAMA_API_URL").unwrap_or_else(|_| "http://127.0.0.1:11434".into());

        let sms_api_url = std::env::var("SMS_API_URL").ok().filter(|s| !s.is_empty());

        let default_model =
            std::env::var("DEFAULT_MODEL").unwrap_or_else(|_| "llama3.2-vision:latest".into());

        let quotas = PlanQuotas {
            free: env_i32("QUOTA_FREE", 20),
            premium: env_i32("QUOTA_PREMIUM", 40),
            administrator: env_i32("QUOTA_ADMINISTRATOR", 1_000_000),
        };

        let verification_ttl_mins: i64 = std::env::var("VERIFICATION_TTL_MINS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("VERIFICATION_TTL_MINS must be a valid i64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            ollama_url,
            sms_api_url,
            default_model,
            quotas,
            verification_ttl_mins,
        }
    }
}

fn env_i32(name: &str, default: i32) -> i32 {
    std::env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or_else(|_| panic!("{name} must be a valid i32"))
}
