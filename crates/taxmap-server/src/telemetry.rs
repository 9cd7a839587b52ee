use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::time::Duration;
use taxmap_model::SegmentKind;
use tokio::sync::Mutex;

const METRIC_SUBSYSTEM: &str = "taxmap";
const METRIC_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Default)]
pub(crate) struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
    latency_ns: Mutex<HashMap<String, Vec<u64>>>,
}

impl RequestMetrics {
    pub(crate) async fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        let mut latency_map = self.latency_ns.lock().await;
        latency_map
            .entry(route.to_string())
            .or_default()
            .push(latency.as_nanos() as u64);
    }
}

fn percentile_ns(values: &[u64], pct: f64) -> u64 {
    if values.is_empty() {
        return 0;
    }
    let mut v = values.to_vec();
    v.sort_unstable();
    let idx = ((v.len() as f64 - 1.0) * pct).round() as usize;
    v[idx]
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> Response {
    let mut body = String::new();
    body.push_str(&format!(
        "taxmap_dataset_rows{{subsystem=\"{METRIC_SUBSYSTEM}\",version=\"{METRIC_VERSION}\"}} {}\n",
        state.dataset.len()
    ));
    for kind in [SegmentKind::Before, SegmentKind::After] {
        body.push_str(&format!(
            "taxmap_segment_rows{{subsystem=\"{METRIC_SUBSYSTEM}\",version=\"{METRIC_VERSION}\",segment=\"{}\"}} {}\n",
            kind.as_str(),
            state.segments.segment(kind).len()
        ));
    }

    {
        let counts = state.metrics.counts.lock().await;
        let mut rows: Vec<(&(String, u16), &u64)> = counts.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        for ((route, status), count) in rows {
            body.push_str(&format!(
                "taxmap_requests_total{{subsystem=\"{METRIC_SUBSYSTEM}\",version=\"{METRIC_VERSION}\",route=\"{route}\",status=\"{status}\"}} {count}\n"
            ));
        }
    }
    {
        let latency = state.metrics.latency_ns.lock().await;
        let mut rows: Vec<(&String, &Vec<u64>)> = latency.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        for (route, values) in rows {
            body.push_str(&format!(
                "taxmap_request_latency_p95_ns{{subsystem=\"{METRIC_SUBSYSTEM}\",version=\"{METRIC_VERSION}\",route=\"{route}\"}} {}\n",
                percentile_ns(values, 0.95)
            ));
        }
    }

    (StatusCode::OK, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_empty_series_is_zero() {
        assert_eq!(percentile_ns(&[], 0.95), 0);
    }

    #[test]
    fn percentile_picks_the_upper_tail() {
        let values: Vec<u64> = (1..=100).collect();
        assert_eq!(percentile_ns(&values, 0.95), 95);
        assert_eq!(percentile_ns(&values, 0.0), 1);
    }
}
