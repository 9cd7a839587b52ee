#![forbid(unsafe_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::env;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use taxmap_ingest::load_dataset;
use taxmap_query::partition;
use taxmap_server::{
    build_router, validate_startup_config_contract, ApiConfig, AppState, DatasetConfig,
};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn env_duration_secs(name: &str, default_secs: u64) -> Duration {
    Duration::from_secs(env_u64(name, default_secs))
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

/// Accepts either a bare date (midnight) or a full datetime.
fn parse_cutoff(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn env_cutoff(name: &str, default: NaiveDateTime) -> Result<NaiveDateTime, String> {
    match env::var(name) {
        Ok(raw) => parse_cutoff(raw.trim())
            .ok_or_else(|| format!("invalid {name}: {raw} (expected YYYY-MM-DD)")),
        Err(_) => Ok(default),
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("TAXMAP_LOG_JSON", true) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let bind_addr = env::var("TAXMAP_BIND").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let api_cfg = ApiConfig {
        max_body_bytes: env_usize("TAXMAP_MAX_BODY_BYTES", 64 * 1024),
        discovery_ttl: env_duration_secs("TAXMAP_DISCOVERY_TTL_SECS", 30),
        page_ttl: env_duration_secs("TAXMAP_PAGE_TTL_SECS", 60),
        shutdown_drain: env_duration_ms("TAXMAP_SHUTDOWN_DRAIN_MS", 5000),
    };
    let dataset_cfg = DatasetConfig {
        data_path: PathBuf::from(
            env::var("TAXMAP_DATA_PATH").unwrap_or_else(|_| "data/restaurants.parquet".to_string()),
        ),
        cutoff: env_cutoff("TAXMAP_CUTOFF_DATE", taxmap_query::default_cutoff())?,
    };
    validate_startup_config_contract(&api_cfg, &dataset_cfg)?;

    // Dataset problems are fatal before the socket is bound; a server that
    // cannot answer any page has nothing to serve.
    let (dataset, summary) = load_dataset(&dataset_cfg.data_path).map_err(|e| e.to_string())?;
    let segments = partition(&dataset, dataset_cfg.cutoff);
    info!(
        rows = summary.rows,
        unparseable_dates = summary.unparseable_dates,
        before = segments.before.len(),
        after = segments.after.len(),
        "dataset loaded and partitioned"
    );

    let state = AppState::with_config(Arc::new(dataset), Arc::new(segments), api_cfg);
    let app = build_router(state.clone());

    let addr: std::net::SocketAddr = bind_addr
        .parse()
        .map_err(|e| format!("invalid bind addr {bind_addr}: {e}"))?;
    let socket = if addr.is_ipv4() {
        tokio::net::TcpSocket::new_v4().map_err(|e| format!("socket v4 failed: {e}"))?
    } else {
        tokio::net::TcpSocket::new_v6().map_err(|e| format!("socket v6 failed: {e}"))?
    };
    socket
        .set_reuseaddr(true)
        .map_err(|e| format!("set_reuseaddr failed: {e}"))?;
    socket
        .set_keepalive(env_bool("TAXMAP_TCP_KEEPALIVE_ENABLED", true))
        .map_err(|e| format!("set_keepalive failed: {e}"))?;
    socket.bind(addr).map_err(|e| format!("bind failed: {e}"))?;
    let listener: TcpListener = socket
        .listen(1024)
        .map_err(|e| format!("listen failed: {e}"))?;
    info!("taxmap-server listening on {bind_addr}");

    let accepting = state.accepting_requests.clone();
    let drain = state.api.shutdown_drain;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            // Flip readiness first so load balancers stop routing, then
            // drain in-flight requests.
            accepting.store(false, Ordering::Relaxed);
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
