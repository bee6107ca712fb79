pub mod catalog;
pub mod engine;
pub mod export;
pub mod fetcher;
pub mod filter;
pub mod pipeline;
pub mod projector;
pub mod serializer;
pub mod session;
pub mod transform;

pub use crate::domain::model::{ReportDefinition, ReportId, TransformResult, TransformedRow};
pub use crate::domain::ports::{ConfigProvider, DataService, Pipeline, ReferenceCatalog, Storage};
pub use crate::utils::error::Result;
