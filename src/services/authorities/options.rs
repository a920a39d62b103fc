use crate::config::AuthorityConfig;

pub const DEFAULT_PREFIX: &str = "ROLE";
pub const DEFAULT_UPPER_CASE: bool = true;

/// Formatting settings for produced authorities.
///
/// - `prefix` is prepended to every authority, joined to the segments with `_`
/// - `upper_case` uppercases each segment (the prefix is kept as given)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityOptions {
    prefix: String,
    upper_case: bool,
}

impl Default for AuthorityOptions {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            upper_case: DEFAULT_UPPER_CASE,
        }
    }
}

impl AuthorityOptions {
    pub fn new(prefix: impl Into<String>, upper_case: bool) -> Self {
        Self {
            prefix: prefix.into(),
            upper_case,
        }
    }

    pub fn builder() -> AuthorityOptionsBuilder {
        AuthorityOptionsBuilder::default()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn upper_case(&self) -> bool {
        self.upper_case
    }
}

impl From<&AuthorityConfig> for AuthorityOptions {
    fn from(config: &AuthorityConfig) -> Self {
        Self::new(config.prefix.clone(), config.upper_case)
    }
}

/// Each field falls back to its own default when left unset.
#[derive(Debug, Clone, Default)]
pub struct AuthorityOptionsBuilder {
    prefix: Option<String>,
    upper_case: Option<bool>,
}

impl AuthorityOptionsBuilder {
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn upper_case(mut self, upper_case: bool) -> Self {
        self.upper_case = Some(upper_case);
        self
    }

    pub fn build(self) -> AuthorityOptions {
        AuthorityOptions {
            prefix: self.prefix.unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            upper_case: self.upper_case.unwrap_or(DEFAULT_UPPER_CASE),
        }
    }
}
