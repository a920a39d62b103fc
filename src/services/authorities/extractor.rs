use std::borrow::Cow;
use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::claims::{elements, leaf_text};
use super::options::AuthorityOptions;
use crate::error::AuthorityError;

pub const REALM_ACCESS_CLAIM: &str = "realm_access";
pub const RESOURCE_ACCESS_CLAIM: &str = "resource_access";

/// Maps decoded token claims to a flat set of authorities (`ROLE_ADMIN`, `ROLE_ACCOUNT_VIEW-PROFILE`, ...).
///
/// Both extraction modes walk exactly two levels below each top-level claim value.
/// Branches with the wrong shape are skipped, never reported as errors:
/// the caller is expected to have validated the token already.
///
/// Immutable after construction, so one instance can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct AuthorityExtractor {
    options: AuthorityOptions,
}

impl AuthorityExtractor {
    pub fn new(options: AuthorityOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AuthorityOptions {
        &self.options
    }

    /// Realm roles: `{ "<any>": { "<any>": [role, ...] } }` -> `PREFIX_ROLE`.
    ///
    /// Every top-level value is walked, so pass either the whole `realm_access`
    /// entry (`{"realm_access": {"roles": [...]}}`) or a map holding only it.
    pub fn realm_access(&self, claims: &Map<String, Value>) -> HashSet<String> {
        let mut authorities = HashSet::new();
        self.collect_realm(claims.values(), &mut authorities);

        debug!(count = authorities.len(), "realm access authorities extracted");
        authorities
    }

    /// Client roles: `{ "<client>": { "<any>": [role, ...] } }` -> `PREFIX_CLIENT_ROLE`.
    ///
    /// Pass the object found under the `resource_access` claim.
    pub fn resource_access(&self, claims: &Map<String, Value>) -> HashSet<String> {
        let mut authorities = HashSet::new();
        self.collect_resource(claims, &mut authorities);

        debug!(
            count = authorities.len(),
            "resource access authorities extracted"
        );
        authorities
    }

    /// Serializes `claims` first; fails only when it is not a JSON object.
    pub fn realm_access_from<T>(&self, claims: &T) -> Result<HashSet<String>, AuthorityError>
    where
        T: Serialize + ?Sized,
    {
        let claims = to_claims(claims)?;
        Ok(self.realm_access(&claims))
    }

    /// Serializes `claims` first; fails only when it is not a JSON object.
    pub fn resource_access_from<T>(&self, claims: &T) -> Result<HashSet<String>, AuthorityError>
    where
        T: Serialize + ?Sized,
    {
        let claims = to_claims(claims)?;
        Ok(self.resource_access(&claims))
    }

    /// Realm and client roles from the full claim set of an access token.
    ///
    /// Reads `realm_access` and `resource_access`; every other claim is ignored.
    pub fn token_authorities(&self, claims: &Map<String, Value>) -> HashSet<String> {
        let mut authorities = HashSet::new();

        if let Some(realm) = claims.get(REALM_ACCESS_CLAIM) {
            self.collect_realm(std::iter::once(realm), &mut authorities);
        }

        match claims.get(RESOURCE_ACCESS_CLAIM) {
            Some(Value::Object(resources)) => self.collect_resource(resources, &mut authorities),
            Some(_) => trace!(
                claim = RESOURCE_ACCESS_CLAIM,
                "claim is not an object, skipping"
            ),
            None => {}
        }

        debug!(count = authorities.len(), "token authorities extracted");
        authorities
    }

    pub fn token_authorities_from<T>(&self, claims: &T) -> Result<HashSet<String>, AuthorityError>
    where
        T: Serialize + ?Sized,
    {
        let claims = to_claims(claims)?;
        Ok(self.token_authorities(&claims))
    }

    /// `prefix` followed by `_segment` for each segment, uppercased when configured.
    pub fn create_role(&self, segments: &[&str]) -> String {
        let mut role = String::from(self.options.prefix());
        for segment in segments {
            role.push('_');
            if self.options.upper_case() {
                role.push_str(&segment.to_uppercase());
            } else {
                role.push_str(segment);
            }
        }
        role
    }

    fn collect_realm<'a, I>(&self, values: I, out: &mut HashSet<String>)
    where
        I: Iterator<Item = &'a Value>,
    {
        for value in values {
            for entry in elements(value) {
                for leaf in elements(entry) {
                    if let Some(role) = role_name(leaf) {
                        out.insert(self.create_role(&[&*role]));
                    }
                }
            }
        }
    }

    fn collect_resource(&self, resources: &Map<String, Value>, out: &mut HashSet<String>) {
        for (resource, value) in resources {
            for entry in elements(value) {
                for leaf in elements(entry) {
                    if let Some(role) = role_name(leaf) {
                        out.insert(self.create_role(&[resource.as_str(), &*role]));
                    }
                }
            }
        }
    }
}

fn role_name(leaf: &Value) -> Option<Cow<'_, str>> {
    let text = leaf_text(leaf);
    if text.is_none() {
        trace!("non-scalar role entry, skipping");
    }
    text
}

fn to_claims<T>(claims: &T) -> Result<Map<String, Value>, AuthorityError>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(claims)? {
        Value::Object(map) => Ok(map),
        other => Err(AuthorityError::not_an_object(&other)),
    }
}
