pub mod dataset;
pub mod recommender;
pub mod tfidf;

pub use crate::domain::model::Record;
pub use crate::domain::ports::{ConfigProvider, SimilaritySearch, Storage};
pub use crate::utils::error::Result;
