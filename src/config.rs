//! Credential resolution.
//!
//! Explicit arguments win; the process environment is the fallback.
//! Nothing ambient is retained after construction.

use crate::error::{Error, Result};

pub(crate) const TOKEN_ENV: &str = "AXIOM_TOKEN";
pub(crate) const ORG_ID_ENV: &str = "AXIOM_ORG_ID";

#[derive(Debug, Clone)]
pub(crate) struct Credentials {
    pub(crate) token: String,
    pub(crate) org_id: Option<String>,
}

pub(crate) fn resolve(token: Option<String>, org_id: Option<String>) -> Result<Credentials> {
    resolve_with(token, org_id, |name| std::env::var(name).ok())
}

/// Resolution against an arbitrary key-value lookup, so the precedence
/// rules are testable without touching the process environment.
fn resolve_with(
    token: Option<String>,
    org_id: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Credentials> {
    let token = token
        .or_else(|| lookup(TOKEN_ENV))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
        .ok_or(Error::MissingToken)?;

    let org_id = org_id
        .or_else(|| lookup(ORG_ID_ENV))
        .map(|org_id| org_id.trim().to_string())
        .filter(|org_id| !org_id.is_empty());

    Ok(Credentials { token, org_id })
}
