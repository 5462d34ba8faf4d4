//! Account authentication: the orchestration service and its error type.

pub mod authenticator;

pub use authenticator::{AuthError, Authenticator, SESSION_MAX_AGE_MS};
