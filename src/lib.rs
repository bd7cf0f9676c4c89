pub mod analytics;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use crate::analytics::TopCustomersQuery;
pub use crate::app::{PipelineKind, RunSummary, Runner};
pub use crate::config::{cli::LocalStorage, toml_config::AnalyticsConfig};
pub use crate::core::etl::EtlEngine;
pub use crate::domain::model::{CustomerSpend, Sale};
pub use crate::utils::error::{EtlError, Result};
