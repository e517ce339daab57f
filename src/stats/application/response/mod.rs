pub mod assembled_event;
