use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("manufacturer `{0}` was not found")]
    ManufacturerNotFound(String),
    #[error("product `{product}` was not found for manufacturer `{manufacturer}`")]
    ProductNotFound { manufacturer: String, product: String },
    #[error("could not read catalog file `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("catalog validation failed: {0}")]
    Invalid(String),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ManufacturerNotFound(_) | Self::ProductNotFound { .. })
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Failure of a single remote insight fetch. Never surfaced to end users.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("network failure: {0}")]
    Network(String),
    #[error("insight service returned {status}: {body}")]
    Http { status: u16, body: String },
    #[error("malformed insight payload: {0}")]
    Parse(String),
}

impl FetchError {
    pub fn class(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Http { .. } => "http",
            Self::Parse(_) => "parse",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{CatalogError, FetchError};

    #[test]
    fn only_missing_entries_count_as_not_found() {
        let missing = CatalogError::ProductNotFound {
            manufacturer: "达仁堂".to_owned(),
            product: "unknown".to_owned(),
        };
        assert!(missing.is_not_found());
        assert!(CatalogError::ManufacturerNotFound("unknown".to_owned()).is_not_found());
        assert!(!CatalogError::Invalid("duplicate manufacturer".to_owned()).is_not_found());
    }

    #[test]
    fn fetch_errors_expose_stable_classes() {
        assert_eq!(FetchError::Network("refused".to_owned()).class(), "network");
        assert_eq!(FetchError::Http { status: 500, body: String::new() }.class(), "http");
        assert_eq!(FetchError::Parse("eof".to_owned()).class(), "parse");
    }
}
