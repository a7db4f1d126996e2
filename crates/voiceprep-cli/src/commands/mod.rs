pub mod config;
pub mod convert;
pub mod record_upload;
pub mod upload;
