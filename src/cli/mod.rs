use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Completion Service Args ---
    /// API key for the Groq completion service.
    #[arg(long, env = "GROQ_API_KEY", default_value = "")]
    pub groq_api_key: String,

    /// Base URL for the completion service API.
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let the adapter handle it if None
    pub chat_base_url: Option<String>,

    // --- Database Connection Defaults ---
    // Prefill values for the /connect command, the same defaults the settings
    // form offers. /connect with explicit arguments overrides all of them.
    /// Default MySQL hostname.
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Default MySQL port.
    #[arg(long, env = "DB_PORT", default_value = "3306")]
    pub db_port: String,

    /// Default MySQL username.
    #[arg(long, env = "DB_USER", default_value = "root")]
    pub db_user: String,

    /// Default MySQL password.
    #[arg(long, env = "DB_PASSWORD", default_value = "")]
    pub db_password: String,

    /// Default MySQL database name.
    #[arg(long, env = "DB_DATABASE", default_value = "")]
    pub db_database: String,
}
