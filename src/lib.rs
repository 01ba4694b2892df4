pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::soap::SoapRecordClient;
pub use adapters::sql::SqlRecordSink;
pub use adapters::storage::{local::LocalObjectStore, s3::S3Store};
pub use core::etl::EtlEngine;
pub use utils::error::{EtlError, Result};
