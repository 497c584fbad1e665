//! HTTP API server for recording and managing sales.
//!
//! Provides REST endpoints for creating, reading, updating and cancelling
//! sales, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod service;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use domain::EventNotifier;
use metrics_exporter_prometheus::PrometheusHandle;
use sale_store::SaleRepository;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::sales::AppState;
use service::SalesService;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<R, N>(state: Arc<AppState<R, N>>, metrics_handle: PrometheusHandle) -> Router
where
    R: SaleRepository + 'static,
    N: EventNotifier + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/sales", post(routes::sales::create::<R, N>))
        .route(
            "/sales/{id}",
            get(routes::sales::get::<R, N>)
                .put(routes::sales::update::<R, N>)
                .delete(routes::sales::cancel::<R, N>),
        )
        .route(
            "/sales/{id}/items/{item_id}",
            delete(routes::sales::cancel_item::<R, N>),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around a store and a notifier.
pub fn create_state<R: SaleRepository, N: EventNotifier>(store: R, notifier: N) -> Arc<AppState<R, N>> {
    Arc::new(AppState {
        sales: SalesService::new(store, notifier),
    })
}
