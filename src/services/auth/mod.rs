pub mod claims;
pub mod credentials;
pub mod factory;
pub mod jwt;
pub mod replay;
pub mod token_service;

use std::sync::Arc;

use crate::context::ServiceKey;

pub use claims::{Claims, NewClaims};
pub use credentials::CredentialVerifier;
pub use factory::{build_credential_verifier, build_token_service};
pub use token_service::TokenService;

/// Root-context binding for the token service.
pub static TOKEN_SERVICE: ServiceKey<Arc<TokenService>> = ServiceKey::new("token_service");

/// Root-context binding for the `/login` credential check.
pub static CREDENTIALS: ServiceKey<Arc<dyn CredentialVerifier>> = ServiceKey::new("credentials");

/// Bound by the auth middleware once a bearer token has been validated.
pub static CLAIMS: ServiceKey<Claims> = ServiceKey::new("claims");
