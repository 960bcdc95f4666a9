use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

// HS256 secrets shorter than the hash output are rejected.
pub const MIN_HMAC_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("hmac secret must be at least {MIN_HMAC_SECRET_LEN} bytes")]
    WeakSecret,
    #[error("invalid ed25519 private key pem: {0}")]
    PrivateKey(jsonwebtoken::errors::Error),
    #[error("invalid ed25519 public key pem: {0}")]
    PublicKey(jsonwebtoken::errors::Error),
}

/// Key material for one signing algorithm.
///
/// `encoding` is `None` for verify-only deployments (EdDSA with only the
/// public key configured); issuing a token then fails with a signing error.
#[derive(Clone)]
pub struct JwtKeys {
    algorithm: Algorithm,
    encoding: Option<EncodingKey>,
    decoding: DecodingKey,
}

impl std::fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtKeys")
            .field("algorithm", &self.algorithm)
            .field("can_sign", &self.encoding.is_some())
            .finish()
    }
}

impl JwtKeys {
    pub fn hs256(secret: &[u8]) -> Result<Self, KeyError> {
        if secret.len() < MIN_HMAC_SECRET_LEN {
            return Err(KeyError::WeakSecret);
        }

        Ok(Self {
            algorithm: Algorithm::HS256,
            encoding: Some(EncodingKey::from_secret(secret)),
            decoding: DecodingKey::from_secret(secret),
        })
    }

    /// `private_key_pem` must be an Ed25519 private key in PKCS#8 PEM format.
    pub fn ed25519(private_key_pem: Option<&str>, public_key_pem: &str) -> Result<Self, KeyError> {
        let encoding = private_key_pem
            .map(|pem| EncodingKey::from_ed_pem(pem.as_bytes()))
            .transpose()
            .map_err(KeyError::PrivateKey)?;

        let decoding =
            DecodingKey::from_ed_pem(public_key_pem.as_bytes()).map_err(KeyError::PublicKey)?;

        Ok(Self {
            algorithm: Algorithm::EdDSA,
            encoding,
            decoding,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }

    pub fn can_sign(&self) -> bool {
        self.encoding.is_some()
    }

    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, SignError> {
        let key = self.encoding.as_ref().ok_or(SignError::KeyUnavailable)?;

        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());

        jsonwebtoken::encode(&header, claims, key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            SignError::Encode(e)
        })
    }
}

#[derive(Debug, Error)]
pub enum SignError {
    #[error("signing key unavailable")]
    KeyUnavailable,
    #[error("jwt encoding failed: {0}")]
    Encode(jsonwebtoken::errors::Error),
}
