use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL database connection URL. When unset, history lives in memory.
    #[serde(default)]
    pub database_url: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// TMDB image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Language passed to TMDB for titles, overviews and genre names
    #[serde(default = "default_tmdb_language")]
    pub tmdb_language: String,

    /// Region whose streaming providers are reported
    #[serde(default = "default_watch_region")]
    pub watch_region: String,

    /// Structured-object generation endpoint of the AI service
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Bearer token for the AI service
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// Timeout applied to every outbound HTTP call
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_tmdb_language() -> String {
    "pt-BR".to_string()
}

fn default_watch_region() -> String {
    "BR".to_string()
}

fn default_http_timeout_secs() -> u64 {
    15
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_for_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb_language, "pt-BR");
        assert_eq!(config.watch_region, "BR");
        assert_eq!(config.http_timeout_secs, 15);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides_are_read() {
        let vars = vec![
            ("DATABASE_URL".to_string(), "postgres://localhost/cinepick".to_string()),
            ("AI_API_URL".to_string(), "http://localhost:8787/generate-object".to_string()),
            ("PORT".to_string(), "8080".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/cinepick"));
        assert_eq!(
            config.ai_api_url.as_deref(),
            Some("http://localhost:8787/generate-object")
        );
        assert_eq!(config.port, 8080);
    }
}
