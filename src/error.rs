/*
 * Responsibility
 * - crate-wide error type
 * - only decode / conversion / config problems are errors; malformed claim shapes are not
 */
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AuthorityError {
    #[error("claims could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("claims must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },

    #[error("malformed token: {0}")]
    MalformedToken(&'static str),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl AuthorityError {
    pub(crate) fn not_an_object(value: &serde_json::Value) -> Self {
        let found = match value {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "boolean",
            serde_json::Value::Number(_) => "number",
            serde_json::Value::String(_) => "string",
            serde_json::Value::Array(_) => "array",
            serde_json::Value::Object(_) => "object",
        };
        Self::NotAnObject { found }
    }
}
