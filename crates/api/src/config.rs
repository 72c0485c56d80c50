/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the
/// membership platform token. In production, override via environment
/// variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Membership platform bot token (`BOT_API_TOKEN`, required).
    pub bot_api_token: String,
    /// Membership platform base URL (default: the public Bot API).
    pub bot_api_base_url: String,
    /// Directory for uploaded template sources (default: `bot_templates`).
    pub templates_dir: String,
    /// Directory for derived instance sources (default: `user_bots`).
    pub instances_dir: String,
    /// Command used to run instance files (default: `python3`).
    pub instance_runtime: String,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `BOT_API_TOKEN`        | (required)                 |
    /// | `BOT_API_BASE_URL`     | `https://api.telegram.org` |
    /// | `TEMPLATES_DIR`        | `bot_templates`            |
    /// | `INSTANCES_DIR`        | `user_bots`                |
    /// | `INSTANCE_RUNTIME`     | `python3`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let bot_api_token =
            std::env::var("BOT_API_TOKEN").expect("BOT_API_TOKEN must be set");

        let bot_api_base_url = std::env::var("BOT_API_BASE_URL")
            .unwrap_or_else(|_| botforge_provision::platform::DEFAULT_BASE_URL.into());

        let templates_dir =
            std::env::var("TEMPLATES_DIR").unwrap_or_else(|_| "bot_templates".into());

        let instances_dir =
            std::env::var("INSTANCES_DIR").unwrap_or_else(|_| "user_bots".into());

        let instance_runtime =
            std::env::var("INSTANCE_RUNTIME").unwrap_or_else(|_| "python3".into());

        Self {
            host,
            port,
            request_timeout_secs,
            bot_api_token,
            bot_api_base_url,
            templates_dir,
            instances_dir,
            instance_runtime,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
