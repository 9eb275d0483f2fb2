use crate::logger::LogFormat;
use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub cache: Cache,
    pub events: Events,
    pub http: Http,
    pub log: Log,
    pub store: Store,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub backend: String, // "fake" or "jwt"
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub audience: String,
    /// Name of the environment variable holding the HS256 key.
    #[serde(default = "default_signing_key_env")]
    pub signing_key_env: String,
}

fn default_signing_key_env() -> String {
    "JWT_SIGNING_KEY".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Cache {
    pub backend: String, // "memory" or "redis"
    pub dsn: Option<String>,
    #[serde(default = "default_cache_prefix")]
    pub prefix: String,
}

fn default_cache_prefix() -> String {
    "tradelink".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Events {
    pub backend: String, // "log" or "kafka"
    pub bootstrap_servers: Option<String>,
    #[serde(default = "default_topic")]
    pub topic: String,
    #[serde(default = "default_delivery_timeout_secs")]
    pub delivery_timeout_secs: u64,
}

fn default_topic() -> String {
    "tradelink.relation.event".to_string()
}

fn default_delivery_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub tls: Option<Tls>,
}

#[derive(Debug, Deserialize)]
pub struct Tls {
    pub cert_path: String,
    pub key_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub backend: String, // "memory" or "mysql"
    pub dsn: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let raw = r#"
[auth]
backend = "fake"

[cache]
backend = "memory"

[events]
backend = "log"

[http]
address = "127.0.0.1:8080"

[log]
filter = "info"

[store]
backend = "memory"
"#;
        let settings: Settings = Config::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert!(settings.http.tls.is_none());
        assert_eq!(settings.log.format, LogFormat::Pretty);
        assert_eq!(settings.cache.prefix, "tradelink");
        assert_eq!(settings.store.max_connections, 10);
        assert_eq!(settings.auth.signing_key_env, "JWT_SIGNING_KEY");
        assert_eq!(settings.events.topic, "tradelink.relation.event");
        assert_eq!(settings.events.delivery_timeout_secs, 10);
    }
}
