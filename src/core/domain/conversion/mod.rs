//! Unit conversions applied to raw status values.
//!
//! All functions are pure. Cluster metrics are non-negative, so every
//! conversion rejects negative input with a constraint violation and any
//! non-numeric or fractional input (where an integer is required) with a
//! format error.

use crate::core::domain::{
    error::ValidationError, model::metric_event::MetricValue,
    model::raw_status_document::json_type_name,
};
use serde_json::Value;

/// Bytes per megabyte, as the cluster counts them.
pub const BYTES_PER_MEGABYTE: u64 = 1024 * 1024;

/// How a raw value is turned into a [`MetricValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// A byte count reported as bytes.
    IdentityBytes,
    /// A megabyte quantity converted to bytes.
    MegabytesToBytes,
    /// A megabyte quantity kept in megabytes.
    IdentityMegabytes,
    /// A plain count.
    IdentityCount,
}

impl Conversion {
    /// Converts `value`, tagging the result with this conversion's unit.
    pub fn apply(self, value: &Value) -> Result<MetricValue, ValidationError> {
        match self {
            Conversion::IdentityBytes => identity_bytes(value).map(MetricValue::Bytes),
            Conversion::MegabytesToBytes => mb_to_bytes(value).map(MetricValue::Bytes),
            Conversion::IdentityMegabytes => identity_integer(value).map(MetricValue::Megabytes),
            Conversion::IdentityCount => identity_count(value).map(MetricValue::Count),
        }
    }

    /// Short tag used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Conversion::IdentityBytes => "identity-bytes",
            Conversion::MegabytesToBytes => "mb-to-bytes",
            Conversion::IdentityMegabytes => "identity-mb",
            Conversion::IdentityCount => "identity-count",
        }
    }
}

/// Converts megabytes to bytes, rounding to the nearest byte.
///
/// Fractional megabytes are accepted.
///
/// # Errors
/// * `ValidationError::ConstraintViolation` for negative input or a result
///   that does not fit in `u64`
/// * `ValidationError::Format` for non-numeric input
pub fn mb_to_bytes(value: &Value) -> Result<u64, ValidationError> {
    if let Some(mb) = value.as_u64() {
        return mb.checked_mul(BYTES_PER_MEGABYTE).ok_or_else(|| {
            ValidationError::ConstraintViolation(format!(
                "{} MB overflows a byte count",
                mb
            ))
        });
    }

    let mb = as_finite_f64(value)?;
    if mb < 0.0 {
        return Err(negative(value));
    }
    let bytes = (mb * BYTES_PER_MEGABYTE as f64).round();
    if bytes >= u64::MAX as f64 {
        return Err(ValidationError::ConstraintViolation(format!(
            "{} MB overflows a byte count",
            mb
        )));
    }
    Ok(bytes as u64)
}

/// Passes a byte count through after validation.
///
/// # Errors
/// Returns `ValidationError` unless `value` is a non-negative integer.
pub fn identity_bytes(value: &Value) -> Result<u64, ValidationError> {
    identity_integer(value)
}

/// Passes a count through after validation.
///
/// # Errors
/// Returns `ValidationError` unless `value` is a non-negative integer.
pub fn identity_count(value: &Value) -> Result<u64, ValidationError> {
    identity_integer(value)
}

fn identity_integer(value: &Value) -> Result<u64, ValidationError> {
    if let Some(v) = value.as_u64() {
        return Ok(v);
    }
    if value.as_i64().is_some() {
        return Err(negative(value));
    }

    let v = as_finite_f64(value)?;
    if v < 0.0 {
        return Err(negative(value));
    }
    if v.fract() != 0.0 {
        return Err(ValidationError::Format(format!(
            "expected an integer, found {}",
            value
        )));
    }
    if v >= u64::MAX as f64 {
        return Err(ValidationError::ConstraintViolation(format!(
            "{} does not fit in an unsigned 64-bit integer",
            value
        )));
    }
    Ok(v as u64)
}

fn as_finite_f64(value: &Value) -> Result<f64, ValidationError> {
    match value.as_f64() {
        Some(v) if v.is_finite() => Ok(v),
        Some(_) => Err(ValidationError::Format(format!(
            "expected a finite number, found {}",
            value
        ))),
        None => Err(ValidationError::Format(format!(
            "expected a number, found {}",
            json_type_name(value)
        ))),
    }
}

fn negative(value: &Value) -> ValidationError {
    ValidationError::ConstraintViolation(format!(
        "cluster metrics cannot be negative, found {}",
        value
    ))
}
