//! Authentication and token signing configuration

use serde::{Deserialize, Serialize};

/// Placeholder secret used when `JWT_SECRET` is not set
pub const DEFAULT_DEVELOPMENT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared secret for HS256 signing
    pub secret: String,

    /// Algorithm for JWT signing (HS256 or RS256)
    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    /// PEM private key path (RS256 only)
    #[serde(default)]
    pub private_key_path: Option<String>,

    /// PEM public key path (RS256 only)
    #[serde(default)]
    pub public_key_path: Option<String>,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,

    /// Clock skew tolerance in seconds applied to expiry and not-before
    #[serde(default)]
    pub leeway: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_DEVELOPMENT_SECRET),
            algorithm: default_algorithm(),
            private_key_path: None,
            public_key_path: None,
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("eventide"),
            audience: String::from("eventide-api"),
            leeway: 0,
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Switch to RS256 with the given PEM key files
    pub fn with_rsa_keys(
        mut self,
        private_key_path: impl Into<String>,
        public_key_path: impl Into<String>,
    ) -> Self {
        self.algorithm = String::from("RS256");
        self.private_key_path = Some(private_key_path.into());
        self.public_key_path = Some(public_key_path.into());
        self
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_DEVELOPMENT_SECRET
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = JwtConfig::default();

        Self {
            jwt: JwtConfig {
                secret: env_or("JWT_SECRET", defaults.secret),
                algorithm: env_or("JWT_ALGORITHM", defaults.algorithm).to_uppercase(),
                private_key_path: std::env::var("JWT_PRIVATE_KEY_PATH").ok(),
                public_key_path: std::env::var("JWT_PUBLIC_KEY_PATH").ok(),
                access_token_expiry: env_parse("JWT_ACCESS_TOKEN_EXPIRY", defaults.access_token_expiry),
                refresh_token_expiry: env_parse("JWT_REFRESH_TOKEN_EXPIRY", defaults.refresh_token_expiry),
                issuer: env_or("JWT_ISSUER", defaults.issuer),
                audience: env_or("JWT_AUDIENCE", defaults.audience),
                leeway: env_parse("JWT_LEEWAY", defaults.leeway),
            },
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn default_algorithm() -> String {
    String::from("HS256")
}
