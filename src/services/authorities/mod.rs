/*!
 * Claims -> authority mapping
 *
 * Responsibility:
 * - walk realm_access / resource_access shaped claims and build prefixed authorities
 * - formatting rules (prefix, upper case) live in AuthorityOptions
 *
 * Public API:
 * - AuthorityExtractor
 * - AuthorityOptions / AuthorityOptionsBuilder
 */

mod claims;
mod extractor;
mod options;

pub use extractor::{AuthorityExtractor, REALM_ACCESS_CLAIM, RESOURCE_ACCESS_CLAIM};
pub use options::{AuthorityOptions, AuthorityOptionsBuilder, DEFAULT_PREFIX, DEFAULT_UPPER_CASE};
