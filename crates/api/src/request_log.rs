//! Optional capture of dispatched requests.
//!
//! The interceptor calls the hook once the authorization decision has been
//! made, right before dispatch. Hooks cannot fail the request.

use axum::extract::Request;
use axum::http::header::AUTHORIZATION;

use crate::context::AuthorizedRequestContext;

pub trait RequestLogHook: Send + Sync {
    fn on_dispatch(&self, req: &Request, ctx: &AuthorizedRequestContext);
}

/// Logs the request line, headers and decided context through `tracing`.
///
/// The `Authorization` header value is redacted; the body is not read.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingRequestLog;

impl RequestLogHook for TracingRequestLog {
    fn on_dispatch(&self, req: &Request, ctx: &AuthorizedRequestContext) {
        let headers: Vec<String> = req
            .headers()
            .iter()
            .map(|(name, value)| {
                if name == AUTHORIZATION {
                    format!("{name}: <redacted>")
                } else {
                    format!("{name}: {}", value.to_str().unwrap_or("<binary>"))
                }
            })
            .collect();

        tracing::info!(
            method = %req.method(),
            uri = %req.uri(),
            version = ?req.version(),
            headers = %headers.join("\n"),
            principal_kind = %ctx.principal().kind(),
            principal = ctx.principal().display_name(),
            tenant_id = %ctx.tenant_id(),
            "http request"
        );
    }
}
