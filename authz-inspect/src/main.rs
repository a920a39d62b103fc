use std::{
    collections::HashSet,
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use keycloak_authorities::{AuthorityConfig, AuthorityExtractor, AuthorityOptions, token};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Print the authorities a Keycloak style token (or claims document) maps to.
///
/// - Token signatures are NOT verified; this is a debugging aid.
/// - Prefix / case default to AUTHORITY_PREFIX / AUTHORITY_UPPER_CASE (or .env),
///   flags override them.
/// - Output is sorted, one authority per line (or a JSON array with --json).
#[derive(Parser, Debug)]
#[command(name = "authz-inspect", version, about)]
struct Args {
    /// Compact access token (header.payload.signature)
    #[arg(long, conflicts_with = "claims", required_unless_present = "claims")]
    token: Option<String>,

    /// Claims JSON document. Use `-` to read stdin.
    #[arg(long, value_name = "FILE")]
    claims: Option<PathBuf>,

    /// Which claims shape to read
    #[arg(long, value_enum, default_value_t = Mode::Token)]
    mode: Mode,

    /// Authority prefix (e.g. ROLE, AUTH)
    #[arg(long)]
    prefix: Option<String>,

    /// Uppercase role segments (true/false)
    #[arg(long)]
    upper_case: Option<bool>,

    /// Print a JSON array instead of plain lines
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Full access token claims: realm_access + resource_access
    Token,
    /// Map whose values hold realm roles, e.g. {"realm_access": {"roles": [...]}}
    Realm,
    /// The resource_access object, e.g. {"account": {"roles": [...]}}
    Resource,
}

fn init_tracing() {
    // RUST_LOG=keycloak_authorities=trace shows skipped branches
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_options(config: &AuthorityConfig, args: &Args) -> AuthorityOptions {
    let mut builder = AuthorityOptions::builder()
        .prefix(config.prefix.clone())
        .upper_case(config.upper_case);
    if let Some(prefix) = &args.prefix {
        builder = builder.prefix(prefix.clone());
    }
    if let Some(upper_case) = args.upper_case {
        builder = builder.upper_case(upper_case);
    }
    builder.build()
}

fn read_claims_file(path: &Path) -> Result<Value> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read claims from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("failed to read claims file {}", path.display()))?
    };

    serde_json::from_str(&raw).context("claims file is not valid JSON")
}

fn load_claims(args: &Args) -> Result<Value> {
    match (&args.token, &args.claims) {
        (Some(token), _) => Ok(Value::Object(token::decode_payload(token)?)),
        (None, Some(path)) => read_claims_file(path),
        (None, None) => anyhow::bail!("either --token or --claims is required"),
    }
}

fn extract(extractor: &AuthorityExtractor, mode: Mode, claims: &Value) -> Result<HashSet<String>> {
    let authorities = match mode {
        Mode::Token => extractor.token_authorities_from(claims)?,
        Mode::Realm => extractor.realm_access_from(claims)?,
        Mode::Resource => extractor.resource_access_from(claims)?,
    };
    Ok(authorities)
}

fn render(authorities: HashSet<String>, json: bool) -> Result<String> {
    let mut sorted: Vec<String> = authorities.into_iter().collect();
    sorted.sort();

    if json {
        Ok(serde_json::to_string_pretty(&sorted)?)
    } else {
        Ok(sorted.join("\n"))
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = AuthorityConfig::from_env()?;
    let extractor = AuthorityExtractor::new(build_options(&config, &args));
    tracing::debug!(options = ?extractor.options(), mode = ?args.mode, "inspecting claims");

    let claims = load_claims(&args)?;
    let authorities = extract(&extractor, args.mode, &claims)?;

    let output = render(authorities, args.json)?;
    if !output.is_empty() {
        println!("{output}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["authz-inspect"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn test_args_require_an_input() {
        assert!(Args::try_parse_from(["authz-inspect"]).is_err());
        assert!(Args::try_parse_from(["authz-inspect", "--token", "a.b.c", "--claims", "-"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let config = AuthorityConfig {
            prefix: "SCOPE".to_string(),
            upper_case: true,
        };

        let options = build_options(&config, &args(&["--claims", "-"]));
        assert_eq!(options, AuthorityOptions::new("SCOPE", true));

        let options = build_options(
            &config,
            &args(&["--claims", "-", "--prefix", "AUTH", "--upper-case", "false"]),
        );
        assert_eq!(options, AuthorityOptions::new("AUTH", false));
    }

    #[test]
    fn test_read_claims_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"account": {{"roles": ["view-profile"]}}}}"#).unwrap();

        let claims = read_claims_file(file.path()).unwrap();
        assert_eq!(claims, json!({"account": {"roles": ["view-profile"]}}));
    }

    #[test]
    fn test_read_claims_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "roles: [admin]").unwrap();

        assert!(read_claims_file(file.path()).is_err());
    }

    #[test]
    fn test_extract_modes() {
        let extractor = AuthorityExtractor::default();
        let claims = json!({
            "realm_access": {"roles": ["user"]},
            "resource_access": {"account": {"roles": ["view-profile"]}}
        });

        let token = extract(&extractor, Mode::Token, &claims).unwrap();
        assert_eq!(token.len(), 2);
        assert!(token.contains("ROLE_USER"));
        assert!(token.contains("ROLE_ACCOUNT_VIEW-PROFILE"));

        let realm = extract(&extractor, Mode::Realm, &claims).unwrap();
        assert!(realm.contains("ROLE_USER"));

        let resource = extract(&extractor, Mode::Resource, &claims["resource_access"]).unwrap();
        assert_eq!(resource.into_iter().collect::<Vec<_>>(), vec!["ROLE_ACCOUNT_VIEW-PROFILE"]);
    }

    #[test]
    fn test_extract_rejects_non_object_claims() {
        let extractor = AuthorityExtractor::default();
        assert!(extract(&extractor, Mode::Realm, &json!(["admin"])).is_err());
    }

    #[test]
    fn test_render_is_sorted() {
        let authorities: HashSet<String> = ["ROLE_USER", "ROLE_ADMIN"]
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(render(authorities.clone(), false).unwrap(), "ROLE_ADMIN\nROLE_USER");
        let rendered: Vec<String> =
            serde_json::from_str(&render(authorities, true).unwrap()).unwrap();
        assert_eq!(rendered, vec!["ROLE_ADMIN", "ROLE_USER"]);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(HashSet::new(), false).unwrap(), "");
    }
}
