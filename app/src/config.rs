use crate::error::{Result, RiskError};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_file: PathBuf,
    pub map_file: PathBuf,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout: Duration,
    pub bind_addr: String,
    pub bot: Option<BotConfig>,
}

#[derive(Clone)]
pub struct BotConfig {
    pub token: String,
    pub api_url: String,
    pub poll_timeout_secs: u64,
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let data_file = dotenvy::var("DATA_FILE")
            .unwrap_or_else(|_| "risk_data.json".to_string())
            .into();

        let map_file = dotenvy::var("MAP_FILE")
            .unwrap_or_else(|_| "map.html".to_string())
            .into();

        let geocoder_url = dotenvy::var("GEOCODER_URL")
            .unwrap_or_else(|_| DEFAULT_GEOCODER_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let geocoder_user_agent = dotenvy::var("GEOCODER_USER_AGENT")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "health_risk_bot".to_string());

        let geocoder_timeout = Duration::from_secs(parse_env_u64("GEOCODER_TIMEOUT_SECS", 5)?);

        let bind_addr =
            dotenvy::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

        let enable_bot = dotenvy::var("ENABLE_BOT")
            .unwrap_or_else(|_| "true".to_string())
            .parse::<bool>()
            .map_err(|_| RiskError::Config("Invalid ENABLE_BOT".to_string()))?;

        let bot = if enable_bot {
            let token = dotenvy::var("TELEGRAM_BOT_TOKEN")
                .ok()
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    RiskError::Config(
                        "TELEGRAM_BOT_TOKEN is required when ENABLE_BOT is true".to_string(),
                    )
                })?;

            let api_url = dotenvy::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_URL.to_string())
                .trim_end_matches('/')
                .to_string();

            Some(BotConfig {
                token,
                api_url,
                poll_timeout_secs: parse_env_u64("POLL_TIMEOUT_SECS", 30)?,
            })
        } else {
            None
        };

        Ok(Config {
            data_file,
            map_file,
            geocoder_url,
            geocoder_user_agent,
            geocoder_timeout,
            bind_addr,
            bot,
        })
    }
}

fn parse_env_u64(key: &str, default: u64) -> Result<u64> {
    dotenvy::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u64>()
        .map_err(|_| RiskError::Config(format!("Invalid {key}")))
}
