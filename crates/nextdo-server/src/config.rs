use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "nextdo.toml";
pub const ENV_PREFIX: &str = "TODO_";

const DEFAULT_PORT: u16 = 7540;
const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_DBFILE: &str = "scheduler.db";
const DEFAULT_WEB_DIR: &str = "web";
const DEFAULT_TASK_LIMIT: u32 = 50;
const DEFAULT_TOKEN_TTL_HOURS: u64 = 8;

/// Server settings, built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Path of the SQLite database file.
    #[serde(default = "default_dbfile")]
    pub dbfile: String,
    /// Directory served for every path the API does not claim. Empty disables it.
    #[serde(default = "default_web_dir")]
    pub web_dir: Option<String>,
    /// Sign-in password. Unset or empty leaves the task endpoints open.
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: Option<String>,
    /// Token signing key. Falls back to a digest of the password.
    #[serde(default, deserialize_with = "lenient_string")]
    pub jwt_key: Option<String>,
    /// Maximum number of tasks returned by a list or search.
    #[serde(default = "default_task_limit")]
    pub task_limit: u32,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
            dbfile: default_dbfile(),
            web_dir: default_web_dir(),
            password: None,
            jwt_key: None,
            task_limit: default_task_limit(),
            token_ttl_hours: default_token_ttl_hours(),
        }
    }
}

impl ServerConfig {
    /// Load from the TOML file at `config_path` (default `nextdo.toml`),
    /// then apply `TODO_*` environment overrides. A missing file is not an error.
    pub fn load(config_path: Option<&str>) -> Result<Self, figment::Error> {
        Self::figment(config_path.unwrap_or(DEFAULT_CONFIG_FILE)).extract()
    }

    fn figment(path: &str) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn auth_enabled(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }

    pub fn static_dir(&self) -> Option<&str> {
        self.web_dir.as_deref().filter(|dir| !dir.is_empty())
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_dbfile() -> String {
    DEFAULT_DBFILE.to_string()
}
fn default_web_dir() -> Option<String> {
    Some(DEFAULT_WEB_DIR.to_string())
}
fn default_task_limit() -> u32 {
    DEFAULT_TASK_LIMIT
}
fn default_token_ttl_hours() -> u64 {
    DEFAULT_TOKEN_TTL_HOURS
}

// Environment values such as `TODO_PASSWORD=12345` arrive as numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
        Bool(bool),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Int(n) => n.to_string(),
        Raw::Float(n) => n.to_string(),
        Raw::Bool(b) => b.to_string(),
    }))
}
