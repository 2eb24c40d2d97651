// In crates/app-config/src/lib.rs

use std::path::Path;

use config::{Config, Environment, File};

pub mod error;
pub mod types;

// Re-export the most important types for easy access.
pub use error::{Error, Result};
pub use types::{
    AppSettings, BinanceSettings, Exchange, HttpSettings, KucoinSettings, MarketSettings, NewsSettings,
    SentimentSettings, Settings, TelegramSettings,
};

/// Credentials are read from their conventional variable names, on top of
/// whatever the files and `APP_` variables say.
const CREDENTIAL_VARS: [(&str, &str); 4] = [
    ("news.api_key", "NEWS_API_KEY"),
    ("telegram.bot_token", "TELEGRAM_BOT_TOKEN"),
    ("telegram.chat_id", "TELEGRAM_CHAT_ID"),
    ("sentiment.api_token", "HF_API_TOKEN"),
];

/// Loads the application settings from the `config/` directory.
///
/// The environment name comes from `APP_ENVIRONMENT` and defaults to
/// "development".
pub fn load_settings() -> Result<Settings> {
    let environment = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "development".into());
    load_settings_from(Path::new("config"), &environment)
}

/// Loads and validates settings from `dir`.
///
/// This function orchestrates the layered configuration loading:
/// 1. Reads from a default `base.toml` file.
/// 2. Merges settings from an environment-specific file (e.g., `development.toml`), if present.
/// 3. Merges settings from environment variables (e.g., `APP_MARKET__SYMBOL=ETH/USDT`).
/// 4. Applies the credential variables (`NEWS_API_KEY`, `TELEGRAM_BOT_TOKEN`, ...).
///
/// `app.environment` always reports `environment`.
pub fn load_settings_from(dir: &Path, environment: &str) -> Result<Settings> {
    let mut builder = Config::builder()
        .add_source(File::from(dir.join("base")))
        .add_source(File::from(dir.join(environment)).required(false))
        .add_source(Environment::with_prefix("APP").prefix_separator("_").separator("__"))
        .set_override("app.environment", environment)?;

    for (key, var) in CREDENTIAL_VARS {
        let value = std::env::var(var).ok().filter(|v| !v.trim().is_empty());
        builder = builder.set_override_option(key, value)?;
    }

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}
