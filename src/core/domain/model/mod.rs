pub mod client_config;
pub mod field_spec;
pub mod metric_event;
pub mod raw_status_document;
