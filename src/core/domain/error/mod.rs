use thiserror::Error;

/// The main error type for cluster metric collection.
///
/// Only `Fetch` and `Decode` abort a collection cycle. Problems with a
/// single field never surface here; they are reported as
/// [`FieldWarning`](crate::FieldWarning)s next to a partial event.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// The status request failed at the transport or HTTP level
    ///
    /// # Fields
    /// * `0` - A description of the failed request
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The response body is not valid JSON or its root is not an object
    ///
    /// # Fields
    /// * `0` - A description of the decoding failure
    #[error("Decode error: {0}")]
    Decode(String),

    /// Represents validation failures of client configuration
    ///
    /// # Fields
    /// * `source` - The underlying validation error
    #[error("Validation error: {source}")]
    Validation {
        #[from]
        source: ValidationError,
    },
}

/// Specialized error type for validation failures.
///
/// Raised by value objects while building a client, and by unit
/// conversions when a resolved value is outside its domain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Represents a validation failure for a specific field
    ///
    /// # Fields
    /// * `field` - The name of the field that failed validation
    /// * `message` - A detailed message about why validation failed
    #[error("Field '{field}' validation failed: {message}")]
    Field { field: String, message: String },

    /// Represents format/type validation failures
    ///
    /// # Fields
    /// * `0` - Description of the format violation
    #[error("Format error: {0}")]
    Format(String),

    /// Represents violations of domain constraints
    ///
    /// # Fields
    /// * `0` - Description of the constraint violation
    #[error("Domain constraint violation: {0}")]
    ConstraintViolation(String),
}

/// Type alias for Results that may fail with a CollectorError
pub type CollectorResult<T> = Result<T, CollectorError>;
