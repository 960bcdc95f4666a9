/*
 * Responsibility
 * - axum に渡す共有 state (AppState): router + root context
 * - root context には起動時に作った service を一度だけ bind する (以後 read-only)
 * - Clone 前提 (中身は Arc)
 */
use std::sync::Arc;

use crate::api;
use crate::context::Context;
use crate::router::{Router, RouterError};
use crate::services::auth::{CREDENTIALS, CredentialVerifier, TOKEN_SERVICE, TokenService};
use crate::services::config::{CONFIG_GETTER, ConfigGetter};
use crate::services::store::{SCOPE, STORE_READER, ScopeOption, StoreReader};

/// Process-level services, built once at startup.
pub struct Services {
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub stores: Arc<dyn StoreReader>,
    pub config: Arc<dyn ConfigGetter>,
    pub scope: ScopeOption,
}

#[derive(Clone, Debug)]
pub struct AppState {
    pub router: Arc<Router>,
    pub root: Context,
}

impl AppState {
    pub fn new(services: Services) -> Result<Self, RouterError> {
        let router = api::routes(services.tokens.clone())?;

        let root = Context::new()
            .with_service(&TOKEN_SERVICE, services.tokens)
            .with_service(&CREDENTIALS, services.credentials)
            .with_service(&STORE_READER, services.stores)
            .with_service(&CONFIG_GETTER, services.config)
            .with_service(&SCOPE, services.scope);

        Ok(Self {
            router: Arc::new(router),
            root,
        })
    }
}
