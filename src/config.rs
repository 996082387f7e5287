// region:    --- Imports
use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::info;

// endregion: --- Imports

// region:    --- Config

/// Process configuration, loaded once at startup from the environment.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub mailer_url: String,
    pub sweep_interval_secs: u64,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: load_or("PORT", "3000"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            mailer_url: load_or("MAILER_URL", "http://localhost:4000"),
            sweep_interval_secs: load_or("SWEEP_INTERVAL_SECS", "60"),
        }
    }
}

fn load_or<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{:<12} --> {} not set, using default: {}", "Config", key, default);
        default.to_string()
    });
    raw.parse()
        .unwrap_or_else(|e| panic!("invalid {} value {:?}: {}", key, raw, e))
}

// endregion: --- Config
