// Adapters layer: concrete implementations of the domain ports for S3, the
// local filesystem, the SOAP import service and the staging database.

pub mod digest;
pub mod soap;
pub mod sql;
pub mod storage;
