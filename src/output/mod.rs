pub mod addresses;
pub mod manifest;
pub mod writer;

pub use addresses::read_addresses;
pub use writer::ResultsWriter;
