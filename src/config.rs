use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub quotes_base_url: String,
    pub nominatim_base_url: String,
    pub osrm_base_url: String,
    pub quote_cache_ttl_seconds: u64,
}

const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_OSRM_BASE_URL: &str = "https://router.project-osrm.org";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            quotes_base_url: base_url_from_env("QUOTES_BASE_URL", None)?,
            nominatim_base_url: base_url_from_env(
                "NOMINATIM_BASE_URL",
                Some(DEFAULT_NOMINATIM_BASE_URL),
            )?,
            osrm_base_url: base_url_from_env("OSRM_BASE_URL", Some(DEFAULT_OSRM_BASE_URL))?,
            quote_cache_ttl_seconds: std::env::var("QUOTE_CACHE_TTL_SECONDS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .map_err(|_| {
                    anyhow::anyhow!("QUOTE_CACHE_TTL_SECONDS must be a valid number of seconds")
                })?,
        };

        // Log successful configuration load (without noise)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Quote API Base URL: {}", config.quotes_base_url);
        tracing::debug!("Nominatim Base URL: {}", config.nominatim_base_url);
        tracing::debug!("OSRM Base URL: {}", config.osrm_base_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

/// Reads a base URL from the environment, falling back to `default` when the
/// variable is unset. The value must parse as an http(s) URL; a trailing
/// slash is stripped so paths can be appended with `format!`.
fn base_url_from_env(var: &str, default: Option<&str>) -> anyhow::Result<String> {
    let raw = match std::env::var(var) {
        Ok(value) => value,
        Err(_) => match default {
            Some(fallback) => fallback.to_string(),
            None => anyhow::bail!("{} environment variable required", var),
        },
    };

    if raw.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", var);
    }

    let parsed = Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", var, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("{} must start with http:// or https://", var);
    }

    Ok(raw.trim().trim_end_matches('/').to_string())
}
