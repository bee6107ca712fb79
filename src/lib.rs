pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::RestDataService;
pub use config::{cli::LocalStorage, toml_config::ServiceConfig};
pub use core::{
    engine::ExportEngine, fetcher::DataFetcher, filter::FilterResolver, pipeline::ReportPipeline,
    session::ReportSession,
};
pub use utils::error::{ReportError, Result};
