/*
 * Responsibility
 * - Keycloak style claims (realm_access / resource_access) -> flat authority set
 * - token validation and HTTP wiring belong to the caller; this crate only maps claims
 *
 * Public API:
 * - AuthorityExtractor / AuthorityOptions
 * - AuthorityConfig (env)
 * - token::decode_payload
 */
pub mod config;
pub mod error;
pub mod services;

pub use config::{AuthorityConfig, ConfigError};
pub use error::AuthorityError;
pub use services::authorities::{
    AuthorityExtractor, AuthorityOptions, AuthorityOptionsBuilder, DEFAULT_PREFIX,
    DEFAULT_UPPER_CASE,
};
pub use services::token;
