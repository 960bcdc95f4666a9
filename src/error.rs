/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body) = error mapper
 * - token / context / routing / store の各エラーを統一的に変換
 *
 * Handler と middleware は Err を返すだけで、ここ以外で error response を組み立てない。
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::context::ContextError;
use crate::router::RouterError;
use crate::services::auth::credentials::CredentialError;
use crate::services::auth::token_service::TokenError;
use crate::services::store::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing credential")]
    MissingCredential,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Context(#[from] ContextError),
    #[error(transparent)]
    Routing(#[from] RouterError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Credentials(#[from] CredentialError),
    #[error("internal server error")]
    Internal,
}

/// How an error is presented on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: &'static str,
}

const UNAUTHORIZED: Classification = Classification {
    status: StatusCode::UNAUTHORIZED,
    code: "UNAUTHORIZED",
    message: "unauthorized",
};

const INTERNAL: Classification = Classification {
    status: StatusCode::INTERNAL_SERVER_ERROR,
    code: "INTERNAL_SERVER_ERROR",
    message: "internal server error",
};

impl AppError {
    /// Total mapping from error kind to wire representation.
    ///
    /// Every auth failure looks the same to the caller; which check failed is
    /// only visible in the logs.
    pub fn classify(&self) -> Classification {
        match self {
            AppError::MissingCredential | AppError::InvalidCredentials => UNAUTHORIZED,
            AppError::Token(e) => match e {
                TokenError::Malformed
                | TokenError::Signature
                | TokenError::Expired
                | TokenError::Replayed
                | TokenError::ReplayBackend(_) => UNAUTHORIZED,
                TokenError::Signing(_) => INTERNAL,
            },
            AppError::Routing(e) => match e {
                RouterError::NotFound { .. } => Classification {
                    status: StatusCode::NOT_FOUND,
                    code: "NOT_FOUND",
                    message: "route not found",
                },
                RouterError::MethodNotAllowed { .. } => Classification {
                    status: StatusCode::METHOD_NOT_ALLOWED,
                    code: "METHOD_NOT_ALLOWED",
                    message: "method not allowed",
                },
                RouterError::DuplicateRoute { .. } => INTERNAL,
            },
            AppError::Context(ContextError::ServiceNotFound { .. })
            | AppError::Store(_)
            | AppError::Credentials(_)
            | AppError::Internal => INTERNAL,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        self.classify().status
    }

    /// Log once, at the level the failure deserves. Token contents are never logged.
    pub fn report(&self, method: &str, path: &str, request_id: Option<&str>) {
        let status = self.status_code().as_u16();
        match self {
            AppError::MissingCredential | AppError::InvalidCredentials | AppError::Token(_) => {
                if let AppError::Token(TokenError::Signing(e)) = self {
                    tracing::error!(method, path, request_id, status, error = %e, "token signing failed");
                } else {
                    tracing::warn!(method, path, request_id, status, reason = %self, "authentication failed");
                }
            }
            AppError::Context(e) => {
                tracing::error!(method, path, request_id, status, error = %e, "context wiring defect");
            }
            AppError::Routing(e) => {
                tracing::debug!(method, path, request_id, status, error = %e, "no route");
            }
            AppError::Store(e) => {
                tracing::error!(method, path, request_id, status, error = %e, "store reader failed");
            }
            AppError::Credentials(e) => {
                tracing::error!(method, path, request_id, status, error = %e, "credential check failed");
            }
            AppError::Internal => {
                tracing::error!(method, path, request_id, status, "internal error");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let Classification {
            status,
            code,
            message,
        } = self.classify();

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        let mut response = (status, Json(body)).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer"),
            );
        }

        if let AppError::Routing(RouterError::MethodNotAllowed { allowed, .. }) = &self {
            let allow = allowed
                .iter()
                .map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if let Ok(value) = HeaderValue::from_str(&allow) {
                response.headers_mut().insert(header::ALLOW, value);
            }
        }

        response
    }
}
