pub mod encoding;
pub mod etl;
pub mod reconciler;
pub mod writer;

pub use crate::domain::model::{BatchReport, Reconciliation, Record};
pub use crate::domain::ports::{ObjectStore, RecordProcessor};
pub use crate::utils::error::Result;
