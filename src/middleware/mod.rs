//! HTTP middleware: request path validation and response security headers.

pub mod security_headers;
pub mod validation;
