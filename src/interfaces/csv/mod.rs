pub mod commission_writer;
pub mod event_reader;
pub mod rate_reader;
