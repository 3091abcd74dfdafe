//! Settings of the application, read from `settings.toml` and from
//! `HALVES__*` environment variables (e.g. `HALVES__EXTRACTOR__API_KEY`).
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use server::OllamaConfig;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    pub cache_path: String,
    pub payer_a: String,
    pub payer_b: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            cache_path: "halves_cache.json".to_string(),
            payer_a: "Payer A".to_string(),
            payer_b: "Payer B".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            database: Database::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub extractor: OllamaConfig,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("HALVES").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn defaults_apply_to_missing_sections() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.server.port, 3000);
        assert!(matches!(settings.server.database, Database::Memory));
        assert_eq!(settings.extractor.base_url, "https://ollama.com");
        assert!(settings.extractor.api_key.is_none());
    }

    #[test]
    fn reads_sqlite_database_and_payers() {
        let settings = parse(
            r#"
            [app]
            payer_a = "Alice"
            payer_b = "Bob"

            [server]
            port = 8080
            database = { sqlite = "halves.db" }

            [extractor]
            api_key = "secret"
            "#,
        );
        assert_eq!(settings.app.payer_a, "Alice");
        assert_eq!(settings.server.port, 8080);
        assert!(matches!(
            settings.server.database,
            Database::Sqlite(ref path) if path == "halves.db"
        ));
        assert_eq!(settings.extractor.api_key.as_deref(), Some("secret"));
    }
}
