/*
 * Responsibility
 * - 環境変数 (.env 含む) の読み込み
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - secret を含むので Debug は手書きで伏せる
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::store::ScopeOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or("development").to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAlgorithm {
    Hs256,
    EdDsa,
}

impl FromStr for TokenAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::Hs256),
            "EDDSA" => Ok(Self::EdDsa),
            _ => Err(ConfigError::Invalid("TOKEN_ALGORITHM")),
        }
    }
}

/// Key material for the token service, by algorithm.
#[derive(Clone)]
pub enum TokenKeys {
    Hs256 {
        secret: String,
    },
    EdDsa {
        private_key_pem: Option<String>,
        public_key_pem: String,
    },
}

#[derive(Clone)]
pub struct TokenConfig {
    pub keys: TokenKeys,
    pub issuer: Option<String>,
    pub ttl_seconds: u64,
    pub jti_tracking: bool,
    pub replay_store_url: Option<String>,
}

#[derive(Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub database_url: String,
    pub database_max_connections: u32,

    pub cors_allowed_origins: Vec<String>,

    pub token: TokenConfig,
    pub store_scope: ScopeOption,
    pub admin: Option<AdminBootstrap>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = parse_or(var("PORT"), "PORT", 3010)?;
        let addr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let database_max_connections =
            parse_or(var("DATABASE_MAX_CONNECTIONS"), "DATABASE_MAX_CONNECTIONS", 5)?;

        let cors_allowed_origins = split_list(var("CORS_ALLOWED_ORIGINS").as_deref());

        let algorithm = match var("TOKEN_ALGORITHM") {
            Some(raw) => raw.parse()?,
            None => TokenAlgorithm::Hs256,
        };

        let keys = match algorithm {
            TokenAlgorithm::Hs256 => TokenKeys::Hs256 {
                secret: var("TOKEN_SECRET").ok_or(ConfigError::Missing("TOKEN_SECRET"))?,
            },
            TokenAlgorithm::EdDsa => TokenKeys::EdDsa {
                private_key_pem: var("TOKEN_PRIVATE_KEY_PEM").map(|v| expand_newlines(&v)),
                public_key_pem: var("TOKEN_PUBLIC_KEY_PEM")
                    .map(|v| expand_newlines(&v))
                    .ok_or(ConfigError::Missing("TOKEN_PUBLIC_KEY_PEM"))?,
            },
        };

        let token = TokenConfig {
            keys,
            issuer: var("TOKEN_ISSUER"),
            ttl_seconds: parse_or(var("TOKEN_TTL_SECONDS"), "TOKEN_TTL_SECONDS", 3600)?,
            jti_tracking: parse_bool(var("TOKEN_JTI_TRACKING"), "TOKEN_JTI_TRACKING", false)?,
            replay_store_url: var("REPLAY_STORE_URL"),
        };

        let store_scope = match var("STORE_SCOPE") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("STORE_SCOPE"))?,
            None => ScopeOption::Default,
        };

        let admin = match (var("ADMIN_USERNAME"), var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminBootstrap { username, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_USERNAME")),
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            database_max_connections,
            cors_allowed_origins,
            token,
            store_scope,
            admin,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let algorithm = match self.token.keys {
            TokenKeys::Hs256 { .. } => TokenAlgorithm::Hs256,
            TokenKeys::EdDsa { .. } => TokenAlgorithm::EdDsa,
        };

        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("database_max_connections", &self.database_max_connections)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("token_algorithm", &algorithm)
            .field("token_issuer", &self.token.issuer)
            .field("token_ttl_seconds", &self.token.ttl_seconds)
            .field("token_jti_tracking", &self.token.jti_tracking)
            .field("store_scope", &self.store_scope)
            .field("admin_bootstrap", &self.admin.is_some())
            .finish_non_exhaustive()
    }
}

fn parse_or<T: FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

fn parse_bool(raw: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(v) = raw else {
        return Ok(default);
    };
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid(key)),
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// PEMs are usually passed as a single line with literal `\n`.
fn expand_newlines(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    const MINIMAL: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/store"),
        ("TOKEN_SECRET", "0123456789abcdef0123456789abcdef"),
    ];

    #[test]
    fn defaults() {
        let config = load(MINIMAL).unwrap();

        assert_eq!(config.addr.port(), 3010);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.database_max_connections, 5);
        assert!(config.cors_allowed_origins.is_empty());
        assert!(matches!(config.token.keys, TokenKeys::Hs256 { .. }));
        assert_eq!(config.token.ttl_seconds, 3600);
        assert!(!config.token.jti_tracking);
        assert_eq!(config.token.issuer, None);
        assert_eq!(config.store_scope, ScopeOption::Default);
        assert!(config.admin.is_none());
    }

    #[test]
    fn database_url_is_required() {
        let err = load(&[("TOKEN_SECRET", "x")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));

        let err = load(&[("DATABASE_URL", "   "), ("TOKEN_SECRET", "x")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let with = |key, value| {
            let mut pairs = MINIMAL.to_vec();
            pairs.push((key, value));
            load(&pairs).unwrap_err()
        };

        assert_eq!(with("PORT", "http"), ConfigError::Invalid("PORT"));
        assert_eq!(
            with("TOKEN_JTI_TRACKING", "maybe"),
            ConfigError::Invalid("TOKEN_JTI_TRACKING")
        );
        assert_eq!(with("TOKEN_ALGORITHM", "RS256"), ConfigError::Invalid("TOKEN_ALGORITHM"));
        assert_eq!(with("STORE_SCOPE", "tenant:1"), ConfigError::Invalid("STORE_SCOPE"));
        assert_eq!(with("ADMIN_USERNAME", "admin"), ConfigError::Missing("ADMIN_PASSWORD"));
    }

    #[test]
    fn eddsa_keys_expand_newlines() {
        let config = load(&[
            ("DATABASE_URL", "postgres://localhost/store"),
            ("TOKEN_ALGORITHM", "EdDSA"),
            ("TOKEN_PUBLIC_KEY_PEM", "-----BEGIN PUBLIC KEY-----\\nabc\\n-----END PUBLIC KEY-----"),
        ])
        .unwrap();

        match config.token.keys {
            TokenKeys::EdDsa {
                private_key_pem,
                public_key_pem,
            } => {
                assert!(private_key_pem.is_none());
                assert_eq!(public_key_pem.lines().count(), 3);
            }
            TokenKeys::Hs256 { .. } => panic!("expected EdDSA keys"),
        }
    }

    #[test]
    fn production_settings() {
        let mut pairs = MINIMAL.to_vec();
        pairs.extend([
            ("APP_ENV", "PROD"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, ,https://b.example"),
            ("TOKEN_JTI_TRACKING", "true"),
            ("STORE_SCOPE", "website:base"),
            ("ADMIN_USERNAME", "admin"),
            ("ADMIN_PASSWORD", "secret"),
        ]);
        let config = load(&pairs).unwrap();

        assert!(config.app_env.is_production());
        assert_eq!(
            config.cors_allowed_origins,
            ["https://a.example", "https://b.example"]
        );
        assert!(config.token.jti_tracking);
        assert_eq!(config.store_scope, ScopeOption::Website("base".into()));
        assert_eq!(config.admin.map(|a| a.username).as_deref(), Some("admin"));
    }

    #[test]
    fn debug_hides_secrets() {
        let rendered = format!("{:?}", load(MINIMAL).unwrap());
        assert!(!rendered.contains("0123456789abcdef"));
        assert!(!rendered.contains("postgres://"));
    }
}
