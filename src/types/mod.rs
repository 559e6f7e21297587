pub mod config;
pub mod record;
pub mod report;
pub mod scoring;
pub mod signals;
