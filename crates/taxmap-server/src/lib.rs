#![forbid(unsafe_code)]

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;
use taxmap_model::Dataset;
use taxmap_query::SegmentPair;

mod config;
mod http;
mod telemetry;

pub use config::{
    validate_startup_config_contract, ApiConfig, DatasetConfig, CONFIG_SCHEMA_VERSION,
};
pub use http::{ApiError, ApiErrorCode};

pub const CRATE_NAME: &str = "taxmap-server";

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[derive(Clone)]
pub struct AppState {
    pub dataset: Arc<Dataset>,
    pub segments: Arc<SegmentPair>,
    pub api: ApiConfig,
    pub ready: Arc<AtomicBool>,
    pub accepting_requests: Arc<AtomicBool>,
    pub(crate) metrics: Arc<telemetry::RequestMetrics>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(dataset: Arc<Dataset>, segments: Arc<SegmentPair>) -> Self {
        Self::with_config(dataset, segments, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(
        dataset: Arc<Dataset>,
        segments: Arc<SegmentPair>,
        api: ApiConfig,
    ) -> Self {
        Self {
            dataset,
            segments,
            api,
            ready: Arc::new(AtomicBool::new(true)),
            accepting_requests: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(telemetry::RequestMetrics::default()),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(http::handlers::landing_handler))
        .route("/healthz", get(http::handlers::healthz_handler))
        .route("/readyz", get(http::handlers::readyz_handler))
        .route("/metrics", get(http::handlers::metrics_handler))
        .route("/v1/version", get(http::handlers::version_handler))
        .route("/v1/pages", get(http::handlers::pages_handler))
        .route("/v1/pages/:page", get(http::handlers::page_handler))
        .route("/v1/records/:id", get(http::handlers::record_handler))
        .route("/v1/selection", post(http::handlers::selection_handler))
        .layer(DefaultBodyLimit::max(state.api.max_body_bytes))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_matches_known_vector() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
