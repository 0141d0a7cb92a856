//! Signing key material for JWT issue and verification
//!
//! Keys are loaded once at startup and handed to the token service. They are
//! never reloaded or rotated while the process runs.

use std::fs;
use std::path::{Path, PathBuf};

use et_shared::config::{Environment, JwtConfig};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey};
use rand::RngCore;
use tracing::warn;

use crate::errors::TokenError;

use super::config::parse_algorithm;

/// Shortest HS256 secret accepted outside development
pub const MIN_SECRET_LENGTH: usize = 32;

/// Where the key material came from, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    Secret,
    Pem,
    Files { private_key: PathBuf, public_key: PathBuf },
}

/// Process-wide signing and verification keys
#[derive(Clone)]
pub struct SigningKeys {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    source: KeySource,
}

impl std::fmt::Debug for SigningKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKeys")
            .field("algorithm", &self.algorithm)
            .field("source", &self.source)
            .finish()
    }
}

impl SigningKeys {
    /// HS256 keys from a shared secret
    ///
    /// # Errors
    ///
    /// * `TokenError::KeyLoadError` - the secret is shorter than [`MIN_SECRET_LENGTH`] bytes
    pub fn from_secret(secret: &[u8]) -> Result<Self, TokenError> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(TokenError::KeyLoadError {
                message: format!(
                    "HS256 secret must be at least {} bytes, got {}",
                    MIN_SECRET_LENGTH,
                    secret.len()
                ),
            });
        }

        Ok(Self {
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            source: KeySource::Secret,
        })
    }

    /// RS256 keys from PEM strings (embedded keys and tests)
    ///
    /// # Arguments
    ///
    /// * `private_key_pem` - PEM-encoded RSA private key
    /// * `public_key_pem` - PEM-encoded RSA public key
    pub fn from_rsa_pem_strings(
        private_key_pem: &str,
        public_key_pem: &str,
    ) -> Result<Self, TokenError> {
        let (encoding_key, decoding_key) =
            rsa_keys(private_key_pem.as_bytes(), public_key_pem.as_bytes())?;

        Ok(Self {
            algorithm: Algorithm::RS256,
            encoding_key,
            decoding_key,
            source: KeySource::Pem,
        })
    }

    /// RS256 keys read from PEM files
    ///
    /// # Errors
    ///
    /// * `TokenError::KeyLoadError` - a file is missing or not a valid RSA PEM key
    pub fn from_rsa_files<P: AsRef<Path>>(
        private_key_path: P,
        public_key_path: P,
    ) -> Result<Self, TokenError> {
        let private_key_path = private_key_path.as_ref().to_path_buf();
        let public_key_path = public_key_path.as_ref().to_path_buf();

        let private_key_pem = fs::read(&private_key_path).map_err(|e| TokenError::KeyLoadError {
            message: format!("Failed to read private key {}: {}", private_key_path.display(), e),
        })?;
        let public_key_pem = fs::read(&public_key_path).map_err(|e| TokenError::KeyLoadError {
            message: format!("Failed to read public key {}: {}", public_key_path.display(), e),
        })?;

        let (encoding_key, decoding_key) = rsa_keys(&private_key_pem, &public_key_pem)?;

        Ok(Self {
            algorithm: Algorithm::RS256,
            encoding_key,
            decoding_key,
            source: KeySource::Files {
                private_key: private_key_path,
                public_key: public_key_path,
            },
        })
    }

    /// Loads the keys described by `jwt` for the given environment
    ///
    /// The development placeholder secret is only accepted in development.
    pub fn from_jwt_config(jwt: &JwtConfig, environment: Environment) -> Result<Self, TokenError> {
        match parse_algorithm(&jwt.algorithm)? {
            Algorithm::RS256 => {
                let (private_key, public_key) = jwt
                    .private_key_path
                    .as_deref()
                    .zip(jwt.public_key_path.as_deref())
                    .ok_or_else(|| TokenError::KeyLoadError {
                        message: "RS256 requires JWT_PRIVATE_KEY_PATH and JWT_PUBLIC_KEY_PATH"
                            .to_string(),
                    })?;
                Self::from_rsa_files(private_key, public_key)
            }
            _ => {
                if jwt.is_using_default_secret() {
                    if !environment.is_development() {
                        return Err(TokenError::KeyLoadError {
                            message: format!("JWT_SECRET must be set in {}", environment),
                        });
                    }
                    warn!("Using the development JWT secret; set JWT_SECRET outside development");
                }
                Self::from_secret(jwt.secret.as_bytes())
            }
        }
    }

    /// Random 256-bit secret, hex encoded
    pub fn generate_secret() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn source(&self) -> &KeySource {
        &self.source
    }

    pub(crate) fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

fn rsa_keys(private_pem: &[u8], public_pem: &[u8]) -> Result<(EncodingKey, DecodingKey), TokenError> {
    let encoding_key = EncodingKey::from_rsa_pem(private_pem).map_err(|e| TokenError::KeyLoadError {
        message: format!("Invalid private key format: {}", e),
    })?;
    let decoding_key = DecodingKey::from_rsa_pem(public_pem).map_err(|e| TokenError::KeyLoadError {
        message: format!("Invalid public key format: {}", e),
    })?;
    Ok((encoding_key, decoding_key))
}
