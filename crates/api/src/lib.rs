//! HTTP API: configuration, the request interceptor, and the auth routes.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
pub mod request_log;
