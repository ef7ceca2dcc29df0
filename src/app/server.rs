use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use crate::config::AppSettings;
use crate::core::{ConfigProvider, SimilaritySearch};
use crate::utils::error::Result;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<dyn SimilaritySearch>,
    pub k: usize,
    pub lookup_field: Arc<str>,
}

impl AppState {
    pub fn new(search: Arc<dyn SimilaritySearch>, settings: &AppSettings) -> Self {
        Self {
            search,
            k: settings.k,
            lookup_field: Arc::from(settings.lookup_field.as_str()),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/run_script", get(handlers::run_script))
        .route("/recommendations", get(handlers::recommendations))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http.request",
                        http.method = %req.method(),
                        http.target = %req.uri(),
                    )
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        tracing::info!(
                            http.status = %res.status().as_u16(),
                            elapsed_ms = %latency.as_millis(),
                            "request handled"
                        );
                    },
                ),
        )
        .with_state(state)
}

pub struct RecommenderServer {
    listener: TcpListener,
    app: Router,
}

impl RecommenderServer {
    pub async fn bind<C: ConfigProvider>(config: &C, state: AppState) -> Result<Self> {
        let listener = TcpListener::bind((config.host(), config.port())).await?;
        Ok(Self {
            listener,
            app: build_app(state),
        })
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub async fn run(self) -> Result<()> {
        tracing::info!("🚀 Listening on http://{}", self.local_addr()?);
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("👋 Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
