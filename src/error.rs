//! Crate-wide error alias and the public error taxonomy.
//!
//! Internally everything is an `anyhow::Error`. Errors that cross the public boundary are tagged
//! with an `ErrorType` using `pub_result` so callers can decide how to present them (an alert for
//! a failed write, an empty-state view for a failed read, and so on).

use std::fmt::{Debug, Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// The category of a public-facing error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or configuration file is missing or invalid.
    Config,
    /// The store could not be read, or what it holds is not a transaction collection.
    StorageRead,
    /// The store rejected a write. Nothing was persisted.
    StorageWrite,
    /// The caller asked for something invalid.
    Request,
}

serde_plain::derive_display_from_serialize!(ErrorType);

/// An error that has been tagged with an `ErrorType`.
pub struct TypedError {
    error_type: ErrorType,
    inner: Error,
}

impl TypedError {
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for TypedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.error_type, self.inner)
    }
}

impl Display for TypedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)?;
        let mut source = self.inner.source();
        while let Some(cause) = source {
            write!(f, ": {cause}")?;
            source = cause.source();
        }
        Ok(())
    }
}

impl std::error::Error for TypedError {}

/// Tags the error side of a `Result` with an `ErrorType`.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, kind: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let inner: Error = e.into();
            // Keep the innermost tag if the error was already classified further down.
            if error_type(&inner).is_some() {
                return inner;
            }
            Error::new(TypedError {
                error_type: kind,
                inner,
            })
        })
    }
}

/// Returns the `ErrorType` an error was tagged with, if any.
pub fn error_type(e: &Error) -> Option<ErrorType> {
    e.chain()
        .find_map(|cause| cause.downcast_ref::<TypedError>())
        .map(TypedError::error_type)
}
