//! Query-string handling shared by the list endpoints.

pub mod ordering;
pub mod pagination;

use std::collections::BTreeMap;

use bookshelf_http::error::{AppError, FieldError};
use thiserror::Error;

/// Decoded query string of a list request.
pub type QueryParams = BTreeMap<String, String>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Enter a whole number, got '{value}'.")]
    InvalidNumber { param: String, value: String },

    #[error("Enter a valid year, got '{value}'.")]
    YearOutOfRange { param: String, value: String },

    #[error("Invalid ordering field '{key}'.")]
    UnknownOrderingKey { key: String },
}

impl QueryError {
    /// Query parameter the error is reported under.
    pub fn param(&self) -> &str {
        match self {
            QueryError::InvalidNumber { param, .. } | QueryError::YearOutOfRange { param, .. } => {
                param
            }
            QueryError::UnknownOrderingKey { .. } => ordering::ORDERING_PARAM,
        }
    }
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        AppError::fields(vec![FieldError::new(err.param(), err.to_string())])
    }
}

/// Trimmed value of `key`, treating blank values as absent.
pub fn non_blank<'a>(params: &'a QueryParams, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

/// Case-insensitive substring test; `needle` must already be lowercase.
pub fn icontains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
