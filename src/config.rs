use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key. Posters fall back to a placeholder when unset.
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Base URL that poster paths are appended to
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,

    /// Timeout for a single poster lookup, in seconds
    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Path to the movie table file
    #[serde(default = "default_movies_path")]
    pub movies_path: String,

    /// Path to the similarity matrix file
    #[serde(default = "default_similarity_path")]
    pub similarity_path: String,

    /// Number of recommendations returned when the request doesn't specify one
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Redis connection URL. Poster caching is disabled when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

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

fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w500/".to_string()
}

fn default_poster_timeout_secs() -> u64 {
    10
}

fn default_movies_path() -> String {
    "movies_dict.json".to_string()
}

fn default_similarity_path() -> String {
    "similarity.json".to_string()
}

fn default_recommendation_count() -> usize {
    5
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
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of variables
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: Config = envy::from_iter(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        // An empty key in .env means "not configured"
        Ok(Config {
            tmdb_api_key: config.tmdb_api_key.filter(|key| !key.trim().is_empty()),
            redis_url: config.redis_url.filter(|url| !url.trim().is_empty()),
            ..config
        })
    }

    /// Socket address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
