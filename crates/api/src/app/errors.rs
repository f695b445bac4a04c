use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::Level;

use tenant_gate_auth::{AuthzError, CredentialError, LookupError, TokenError};

/// Errors that terminate a request. Each maps to a status code and a
/// `{"error": <message>}` body.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(#[from] CredentialError),

    #[error("x-tenant-id header is not set")]
    MissingTenantScope,

    #[error(transparent)]
    Forbidden(#[from] AuthzError),

    #[error("{0}")]
    NotPermitted(String),

    #[error("login failed: {0}")]
    Login(LookupError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::MissingTenantScope => StatusCode::FORBIDDEN,
            ApiError::Forbidden(_) | ApiError::NotPermitted(_) => StatusCode::FORBIDDEN,
            ApiError::Login(LookupError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Login(_) => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message.
    ///
    /// Credential failures collapse to "invalid token" so callers cannot tell
    /// a bad signature from an unknown subject. Expiry stays distinguishable
    /// so clients know to log in again.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Unauthenticated(CredentialError::MissingCredential) => {
                "missing credentials".to_string()
            }
            ApiError::Unauthenticated(CredentialError::Token(TokenError::Expired)) => {
                "token has expired".to_string()
            }
            ApiError::Unauthenticated(_) => "invalid token".to_string(),
            ApiError::Login(LookupError::Unavailable(_)) => "user directory unavailable".to_string(),
            ApiError::Login(_) => "invalid username or password".to_string(),
            ApiError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(value: TokenError) -> Self {
        ApiError::Internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.public_message();

        let level = log_level(status);
        if level == Level::ERROR {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else if level == Level::WARN {
            tracing::warn!(status = status.as_u16(), reason = %self, response = %message, "request rejected");
        } else {
            tracing::debug!(status = status.as_u16(), reason = %self, response = %message, "request rejected");
        }

        json_error(status, message)
    }
}

/// Authentication and tenant rejections are routine traffic and stay at
/// `debug`; other client errors are `warn`, server errors `error`.
fn log_level(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Level::DEBUG
    } else {
        Level::WARN
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, axum::Json(json!({ "error": message.into() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_share_one_message() {
        let lookup = ApiError::from(CredentialError::Lookup(LookupError::NotFound));
        let signature = ApiError::from(CredentialError::Token(TokenError::InvalidSignature));
        let service = ApiError::from(CredentialError::UnknownServiceKey);

        for err in [lookup, signature, service] {
            assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(err.public_message(), "invalid token");
        }
    }

    #[test]
    fn tenant_scope_is_forbidden() {
        let err = ApiError::MissingTenantScope;
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.public_message(), "x-tenant-id header is not set");
    }

    #[test]
    fn routine_rejections_log_quietly() {
        let unauthenticated = ApiError::from(CredentialError::MissingCredential);
        let tenant = ApiError::MissingTenantScope;
        let forbidden = ApiError::from(AuthzError::Forbidden("users.read".to_string()));
        for err in [unauthenticated, tenant, forbidden] {
            assert_eq!(log_level(err.status()), Level::DEBUG, "{err}");
        }

        assert_eq!(log_level(ApiError::BadRequest("x".to_string()).status()), Level::WARN);
        assert_eq!(
            log_level(ApiError::Login(LookupError::Unavailable("down".to_string())).status()),
            Level::ERROR
        );
        assert_eq!(log_level(ApiError::Internal("x".to_string()).status()), Level::ERROR);
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::from(TokenError::Signing("key material".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), "internal error");
    }
}
