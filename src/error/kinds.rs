use std::io;

use thiserror::Error;

use crate::session::LoadingStrategy;

/// Crate-wide `Result` type using [`NorthwindError`] as the error.
pub type Result<T> = std::result::Result<T, NorthwindError>;

/// Top-level error type for loading and export operations.
#[derive(Debug, Error)]
pub enum NorthwindError {
    /// Invalid configuration or out-of-order strategy selection.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A record is missing a field the operation requires, or violates a
    /// store constraint.
    #[error("Data integrity error: {0}")]
    DataIntegrity(#[from] IntegrityError),

    /// Destination could not be opened or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A requested entity is not part of the current data set.
    #[error("Not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// An encoder rejected the output it was asked to produce.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The loading strategy can only be chosen before traversal starts.
    #[error("cannot switch to {requested} loading: traversal already started with {active}")]
    TraversalStarted {
        active: LoadingStrategy,
        requested: LoadingStrategy,
    },

    /// Config file not found.
    #[error("config file not found: {0}")]
    FileNotFound(String),

    /// Config file could not be parsed or written.
    #[error("invalid config format: {0}")]
    InvalidFormat(String),

    /// Invalid field value.
    #[error("invalid value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },
}

/// Data integrity violations.
#[derive(Debug, Error)]
pub enum IntegrityError {
    /// A field the output format requires is absent.
    #[error("{entity} {id} has no value for required field '{field}'")]
    MissingField {
        entity: &'static str,
        id: i32,
        field: &'static str,
    },

    /// A text column exceeds its declared length.
    #[error("{entity} {id}: '{field}' is {len} characters, maximum is {max}")]
    FieldTooLong {
        entity: &'static str,
        id: i32,
        field: &'static str,
        len: usize,
        max: usize,
    },

    /// A product references a category that does not exist.
    #[error("product {product_id} references unknown category {category_id}")]
    UnknownCategory { product_id: i32, category_id: i32 },

    /// Primary key already in use.
    #[error("{entity} id {id} already exists")]
    DuplicateKey { entity: &'static str, id: i32 },
}

/// Lookup failures.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// Category is not present in the current hierarchy.
    #[error("category {0} is not in the current hierarchy")]
    Category(i32),

    /// No product name starts with the given prefix.
    #[error("no product name starts with '{0}'")]
    ProductPrefix(String),
}

impl From<serde_json::Error> for NorthwindError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            NorthwindError::Io(err.into())
        } else {
            NorthwindError::Serialization(format!("JSON: {err}"))
        }
    }
}

impl From<tempfile::PersistError> for NorthwindError {
    fn from(err: tempfile::PersistError) -> Self {
        NorthwindError::Io(err.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err: NorthwindError = IntegrityError::MissingField {
            entity: "product",
            id: 7,
            field: "cost",
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Data integrity error: product 7 has no value for required field 'cost'"
        );
    }

    #[test]
    fn test_traversal_started_message() {
        let err = ConfigError::TraversalStarted {
            active: LoadingStrategy::Eager,
            requested: LoadingStrategy::Explicit,
        };
        assert_eq!(
            err.to_string(),
            "cannot switch to explicit loading: traversal already started with eager"
        );
    }

    #[test]
    fn test_io_conversion() {
        let err: NorthwindError = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, NorthwindError::Io(_)));
    }
}
