use crate::{
    core::domain::{
        error::CollectorResult,
        model::{
            field_spec::{CLUSTER_FIELDS, FieldSpec},
            metric_event::MetricEvent,
            raw_status_document::{PathLookup, RawStatusDocument},
        },
    },
    stats::application::response::assembled_event::{
        AssembledEvent, FieldWarning, FieldWarningReason,
    },
};
use tracing::{debug, warn};

/// Drives a field table against a status document and builds the event.
///
/// Each entry is resolved independently: a missing key, a scalar where an
/// object was expected, or a value the conversion rejects drops that entry
/// alone and records a [`FieldWarning`]. The assembler holds only a
/// reference to a static table, so one instance can be shared across any
/// number of concurrent collection cycles.
#[derive(Debug, Clone, Copy)]
pub struct EventAssembler {
    fields: &'static [FieldSpec],
}

impl EventAssembler {
    /// Creates an assembler for the cluster metricset.
    pub fn new() -> Self {
        Self {
            fields: CLUSTER_FIELDS,
        }
    }

    /// Creates an assembler for a custom field table.
    pub fn with_fields(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Decodes `body` and assembles it.
    ///
    /// # Errors
    /// Returns `CollectorError::Decode` if the body is not a JSON object.
    pub fn assemble_slice(&self, body: &[u8]) -> CollectorResult<AssembledEvent> {
        let document = RawStatusDocument::from_slice(body)?;
        Ok(self.assemble(&document))
    }

    /// Builds the event for `document`. Never fails.
    pub fn assemble(&self, document: &RawStatusDocument) -> AssembledEvent {
        let mut event = MetricEvent::new();
        let mut warnings = Vec::new();

        for field in self.fields {
            if let Err(reason) = Self::apply_field(field, document, &mut event) {
                let warning = FieldWarning::new(field, reason);
                warn!(
                    source = %warning.source_path,
                    destination = %warning.destination_path,
                    conversion = field.conversion.as_str(),
                    reason = %warning.reason,
                    "skipping cluster metric"
                );
                warnings.push(warning);
            }
        }

        debug!(
            fields = self.fields.len(),
            leaves = event.leaf_count(),
            skipped = warnings.len(),
            "assembled cluster metric event"
        );

        AssembledEvent { event, warnings }
    }

    fn apply_field(
        field: &FieldSpec,
        document: &RawStatusDocument,
        event: &mut MetricEvent,
    ) -> Result<(), FieldWarningReason> {
        let raw = match document.lookup(field.source) {
            PathLookup::Found(value) => value,
            PathLookup::Missing { segment } => {
                return Err(FieldWarningReason::Missing { segment });
            }
            PathLookup::NotAnObject { segment } => {
                return Err(FieldWarningReason::NotAnObject { segment });
            }
        };

        let value = field
            .conversion
            .apply(raw)
            .map_err(FieldWarningReason::Invalid)?;

        event.insert_at(field.destination, value)?;
        Ok(())
    }
}

impl Default for EventAssembler {
    fn default() -> Self {
        Self::new()
    }
}
