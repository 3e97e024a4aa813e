//! Middleware layered around the file routes.
//!
//! The explorer binds to loopback, but the webview still talks to it over
//! plain HTTP, so the usual request hygiene applies: per-IP rate limits,
//! early rejection of traversal URIs and oversized bodies, and a fixed set
//! of security headers on every response.

pub mod ip;
pub mod rate_limit;
pub mod security_headers;
pub mod validation;

pub use rate_limit::{EndpointRateLimiter, RateLimiter};
