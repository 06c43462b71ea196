//! Infrastructure layer - External service implementations

pub mod http;
pub mod logging;
