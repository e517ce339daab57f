use crate::core::domain::{
    error::ValidationError,
    model::{field_spec::FieldSpec, metric_event::InsertConflict, metric_event::MetricEvent},
};
use thiserror::Error;

/// Why a field was left out of the event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldWarningReason {
    #[error("'{segment}' is missing from the status document")]
    Missing { segment: String },

    #[error("cannot look up '{segment}': parent is not an object")]
    NotAnObject { segment: String },

    #[error("invalid value: {0}")]
    Invalid(ValidationError),

    #[error("cannot place value: {0}")]
    DestinationConflict(String),
}

impl From<InsertConflict> for FieldWarningReason {
    fn from(conflict: InsertConflict) -> Self {
        FieldWarningReason::DestinationConflict(conflict.to_string())
    }
}

/// A non-fatal problem with one field table entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("skipped {source_path} -> {destination_path}: {reason}")]
pub struct FieldWarning {
    pub source_path: String,
    pub destination_path: String,
    pub reason: FieldWarningReason,
}

impl FieldWarning {
    pub(crate) fn new(field: &FieldSpec, reason: FieldWarningReason) -> Self {
        Self {
            source_path: field.source_path(),
            destination_path: field.destination_path(),
            reason,
        }
    }
}

/// The outcome of one collection cycle: the event plus every field that
/// had to be left out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledEvent {
    pub event: MetricEvent,
    pub warnings: Vec<FieldWarning>,
}

impl AssembledEvent {
    /// True when every field of the table made it into the event.
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_event(self) -> MetricEvent {
        self.event
    }
}
