pub mod handlers;
pub mod server;

pub use server::{build_app, AppState, RecommenderServer};
