/// Factory: build the auth services from application `Config`.
use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use crate::config::{TokenConfig, TokenKeys};
use crate::services::auth::credentials::{CredentialVerifier, PgCredentialStore};
use crate::services::auth::jwt::{JwtKeys, KeyError};
use crate::services::auth::replay::{CacheReplayStore, ReplayError, ReplayStore};
use crate::services::auth::token_service::TokenService;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("token keys: {0}")]
    Keys(#[from] KeyError),
    #[error("replay store: {0}")]
    Replay(#[from] ReplayError),
}

pub async fn build_token_service(config: &TokenConfig) -> Result<Arc<TokenService>, FactoryError> {
    let keys = match &config.keys {
        TokenKeys::Hs256 { secret } => JwtKeys::hs256(secret.as_bytes())?,
        TokenKeys::EdDsa {
            private_key_pem,
            public_key_pem,
        } => JwtKeys::ed25519(private_key_pem.as_deref(), public_key_pem)?,
    };

    if !keys.can_sign() {
        tracing::warn!("no signing key configured; token issuance is disabled");
    }

    let mut service = TokenService::new(keys, config.ttl_seconds);

    if let Some(issuer) = &config.issuer {
        service = service.with_issuer(issuer.clone());
    }

    if config.jti_tracking {
        let store: Arc<dyn ReplayStore> = match &config.replay_store_url {
            Some(url) => Arc::new(CacheReplayStore::valkey(url).await?),
            None => Arc::new(CacheReplayStore::in_memory()),
        };
        service = service.with_replay_store(store);
    }

    tracing::info!(
        ttl_seconds = service.ttl_seconds(),
        replay_backend = service.replay_backend().unwrap_or("disabled"),
        "token service ready"
    );

    Ok(Arc::new(service))
}

pub fn build_credential_verifier(db: PgPool) -> Arc<dyn CredentialVerifier> {
    Arc::new(PgCredentialStore::new(db))
}
