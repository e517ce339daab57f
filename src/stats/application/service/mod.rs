pub mod event_assembler;
