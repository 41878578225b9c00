use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub pocketbase: PocketBaseConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
    pub generic: GenericConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub version: String,
    /// Public base URL of this API, used to build OAuth2 callback URLs
    pub api_hostname: String,
    /// Mirror the envelope status onto the HTTP status line
    pub strict_http_status: bool,
    /// Empty means permissive CORS
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PocketBaseConfig {
    pub url: String,
    /// Bootstrap token used as auth context for the OAuth2 code exchange
    pub admin_token: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Session token lifetime in seconds
    pub token_expiry_secs: u64,
    pub private_key: Option<String>,
    pub public_key: Option<String>,
    pub keys_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericConfig {
    /// Collection served under /api/{admin,client}/generic
    pub collection: String,
}

/// Default session lifetime: 20 days
pub const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 1_728_000;

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = match lookup("ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // Server overrides
        if let Some(v) = get("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = get("VERSION") {
            self.server.version = v;
        }
        if let Some(v) = get("API_HOSTNAME") {
            self.server.api_hostname = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("API_STRICT_STATUS") {
            self.server.strict_http_status = v.parse().unwrap_or(self.server.strict_http_status);
        }
        if let Some(v) = get("CORS_ORIGINS") {
            self.server.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // PocketBase overrides; POCKETPAGE_URL is the legacy spelling
        if let Some(v) = get("POCKETBASE_URL").or_else(|| get("POCKETPAGE_URL")) {
            self.pocketbase.url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get("ADMIN_TOKEN") {
            self.pocketbase.admin_token = v;
        }
        if let Some(v) = get("POCKETBASE_TIMEOUT_SECS") {
            self.pocketbase.timeout_secs = v.parse().unwrap_or(self.pocketbase.timeout_secs);
        }

        // Security overrides
        if let Some(v) = get("TOKENEXP") {
            self.security.token_expiry_secs = v.parse().unwrap_or(self.security.token_expiry_secs);
        }
        if let Some(v) = get("PRIVATEKEY") {
            self.security.private_key = Some(v);
        }
        if let Some(v) = get("PUBLICKEY") {
            self.security.public_key = Some(v);
        }
        if let Some(v) = get("KEYS_DIR") {
            self.security.keys_dir = PathBuf::from(v);
        }

        // Logging overrides
        if let Some(v) = get("LOG_FORMAT") {
            self.logging.format = match v.to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                _ => self.logging.format,
            };
        }

        if let Some(v) = get("GENERIC_COLLECTION") {
            self.generic.collection = v;
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                version: env!("CARGO_PKG_VERSION").to_string(),
                api_hostname: "http://localhost:3000".to_string(),
                strict_http_status: false,
                cors_origins: Vec::new(),
            },
            pocketbase: PocketBaseConfig {
                url: "http://127.0.0.1:8090".to_string(),
                admin_token: String::new(),
                timeout_secs: 30,
            },
            security: SecurityConfig {
                token_expiry_secs: DEFAULT_TOKEN_EXPIRY_SECS,
                private_key: None,
                public_key: None,
                keys_dir: PathBuf::from("./keys"),
            },
            logging: LoggingConfig {
                format: LogFormat::Pretty,
            },
            generic: GenericConfig {
                collection: "generic".to_string(),
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.logging.format = LogFormat::Json;
        config.pocketbase.timeout_secs = 15;
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.logging.format = LogFormat::Json;
        config.pocketbase.timeout_secs = 10;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.security.token_expiry_secs, DEFAULT_TOKEN_EXPIRY_SECS);
        assert!(!config.server.strict_http_status);
        assert_eq!(config.generic.collection, "generic");
    }

    #[test]
    fn legacy_pocketbase_variable_is_honoured() {
        let config = AppConfig::from_lookup(lookup(&[("POCKETPAGE_URL", "http://pb:8090/")]));
        assert_eq!(config.pocketbase.url, "http://pb:8090");

        let config = AppConfig::from_lookup(lookup(&[
            ("POCKETPAGE_URL", "http://old:8090"),
            ("POCKETBASE_URL", "http://new:8090"),
        ]));
        assert_eq!(config.pocketbase.url, "http://new:8090");
    }

    #[test]
    fn production_uses_json_logs_and_overrides_apply() {
        let config = AppConfig::from_lookup(lookup(&[
            ("ENV", "production"),
            ("PORT", "8080"),
            ("TOKENEXP", "3600"),
            ("API_STRICT_STATUS", "true"),
            ("CORS_ORIGINS", "https://a.example.com, https://b.example.com"),
        ]));
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.security.token_expiry_secs, 3600);
        assert!(config.server.strict_http_status);
        assert_eq!(config.server.cors_origins.len(), 2);
    }

    #[test]
    fn unparsable_numbers_keep_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("PORT", "abc"), ("TOKENEXP", "")]));
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.security.token_expiry_secs, DEFAULT_TOKEN_EXPIRY_SECS);
    }
}
