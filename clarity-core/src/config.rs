use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClarityConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub reflection: ReflectionSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://journal.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// `[reflection]` section. The API key is never read from the file; it
/// comes from `OPENAI_API_KEY`.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ReflectionSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    /// When true, any generator failure is stored as an empty reflection
    /// instead of failing the submission.
    pub degrade_on_failure: bool,
}

impl Default for ReflectionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 260,
            timeout_seconds: 30,
            degrade_on_failure: true,
        }
    }
}

impl ClarityConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;
        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = ClarityConfig::load("does-not-exist-clarity.toml").unwrap();
        assert_eq!(config.http.port, 5000);
        assert_eq!(config.reflection.model, "gpt-4o-mini");
        assert_eq!(config.reflection.max_tokens, 260);
        assert!((config.reflection.temperature - 0.7).abs() < f32::EPSILON);
        assert!(config.reflection.degrade_on_failure);
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let dir = std::env::temp_dir().join(format!("clarity-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("partial.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "[http]\nhost = \"0.0.0.0\"\nport = 8080\n").unwrap();
        writeln!(f, "[reflection]\ndegrade_on_failure = false\n").unwrap();

        let config = ClarityConfig::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.http.host, "0.0.0.0");
        assert_eq!(config.http.port, 8080);
        assert!(!config.reflection.degrade_on_failure);
        assert_eq!(config.reflection.timeout_seconds, 30);
        assert_eq!(config.database.max_connections, 5);

        std::fs::remove_dir_all(&dir).ok();
    }
}
