//! Token authentication and the "authenticated or read-only" permission policy.

use std::collections::BTreeMap;

use bookshelf_kernel::settings::AuthSettings;
use thiserror::Error;

/// Methods that never modify state and are open to anonymous callers.
const SAFE_METHODS: &[&str] = &["GET", "HEAD", "OPTIONS"];

/// Header schemes accepted in front of the token value.
const TOKEN_SCHEMES: &[&str] = &["Token", "Bearer"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header must be '<Token|Bearer> <key>'")]
    MalformedHeader,

    #[error("invalid token")]
    InvalidToken,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
}

/// Resolves `Authorization` header values against the configured token table.
#[derive(Debug, Clone, Default)]
pub struct TokenAuthenticator {
    tokens: BTreeMap<String, String>,
}

impl TokenAuthenticator {
    pub fn new(tokens: BTreeMap<String, String>) -> Self {
        Self { tokens }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(settings.tokens.clone())
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// `Ok(None)` for anonymous requests, `Err` when credentials are present but wrong.
    pub fn authenticate(&self, header: Option<&str>) -> Result<Option<Principal>, AuthError> {
        let Some(header) = header else {
            return Ok(None);
        };

        let (scheme, key) = header
            .trim()
            .split_once(' ')
            .ok_or(AuthError::MalformedHeader)?;
        if !TOKEN_SCHEMES
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(scheme))
        {
            return Err(AuthError::MalformedHeader);
        }

        let key = key.trim();
        if key.is_empty() || key.contains(' ') {
            return Err(AuthError::MalformedHeader);
        }

        self.tokens
            .get(key)
            .map(|username| {
                Some(Principal {
                    username: username.clone(),
                })
            })
            .ok_or(AuthError::InvalidToken)
    }
}

/// Outcome of a permission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

pub fn is_safe_method(method: &str) -> bool {
    SAFE_METHODS.contains(&method)
}

/// Anyone may read; only authenticated callers may write.
pub fn authenticated_or_read_only(method: &str, principal: Option<&Principal>) -> Decision {
    if is_safe_method(method) || principal.is_some() {
        Decision::Allow
    } else {
        tracing::debug!(target: "bookshelf-authz", method, "anonymous write rejected");
        Decision::Deny
    }
}
