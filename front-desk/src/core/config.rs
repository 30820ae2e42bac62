use loyalty_client::ClientConfig;
use shared::models::BusinessSettings;

/// 前台配置 - desk process settings
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | STORE_URL | (required) | Hosted store project URL |
/// | STORE_API_KEY | (required) | Store API key |
/// | STORE_TIMEOUT_SECS | 30 | Request timeout |
/// | LOG_LEVEL | info | Log level when `RUST_LOG` is unset |
/// | LOG_JSON | false | JSON log lines |
/// | ENVIRONMENT | development | 运行环境 |
/// | SEED_DEMO_DATA | true | Seed demo records into an empty store |
/// | BUSINESS_NAME | My Business | Shown on the settings screen |
/// | POINTS_PER_DOLLAR | 1 | Informational |
/// | POINTS_EXPIRY_DAYS | 365 | Informational |
/// | WELCOME_BONUS | 50 | Informational |
/// | BIRTHDAY_BONUS | 25 | Informational |
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosted store connection
    pub store: ClientConfig,
    pub log_level: String,
    pub log_json: bool,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// Seed demo records when the customers table is empty
    pub seed_demo_data: bool,
    pub business: BusinessSettings,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// Store URL and key are required; everything else has a default.
    pub fn from_env() -> Result<Self, loyalty_client::ClientError> {
        Ok(Self {
            store: ClientConfig::from_env()?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_json: env_parse("LOG_JSON").unwrap_or(false),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            seed_demo_data: env_parse("SEED_DEMO_DATA").unwrap_or(true),
            business: business_from_env(),
        })
    }
}

/// Business settings, falling back to the defaults field by field
pub fn business_from_env() -> BusinessSettings {
    let defaults = BusinessSettings::default();
    BusinessSettings {
        name: std::env::var("BUSINESS_NAME").unwrap_or(defaults.name),
        points_per_dollar: env_parse("POINTS_PER_DOLLAR").unwrap_or(defaults.points_per_dollar),
        expiry_days: env_parse("POINTS_EXPIRY_DAYS").unwrap_or(defaults.expiry_days),
        welcome_bonus: env_parse("WELCOME_BONUS").unwrap_or(defaults.welcome_bonus),
        birthday_bonus: env_parse("BIRTHDAY_BONUS").unwrap_or(defaults.birthday_bonus),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
