use serde::Deserialize;

/// Verification settings for bearer tokens issued by the identity service.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

/// USDA FoodData Central access.
#[derive(Debug, Clone, Deserialize)]
pub struct UsdaConfig {
    pub api_key: String,
    pub base_url: String,
    pub search_limit: u32,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub usda: UsdaConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "nutrilog".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "nutrilog-users".into()),
        };
        let usda = UsdaConfig {
            api_key: std::env::var("USDA_API_KEY")?,
            base_url: std::env::var("USDA_BASE_URL")
                .unwrap_or_else(|_| "https://api.nal.usda.gov/fdc/v1".into()),
            search_limit: env_or("USDA_SEARCH_LIMIT", 30),
            cache_ttl_secs: env_or("FOOD_CACHE_TTL_SECS", 60 * 60),
        };
        Ok(Self {
            database_url,
            jwt,
            usda,
        })
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
