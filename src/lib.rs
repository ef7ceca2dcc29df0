pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{build_app, AppState, RecommenderServer};
pub use config::{cli::LocalStorage, AppSettings};
pub use crate::core::{dataset::Dataset, recommender::Recommender, SimilaritySearch};
pub use utils::error::{RecommenderError, Result};
