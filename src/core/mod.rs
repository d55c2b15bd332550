pub mod analysis;
pub mod engine;
pub mod export;
pub mod pipeline;

pub use crate::domain::model::{Dataset, Record, ReportOutput};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
