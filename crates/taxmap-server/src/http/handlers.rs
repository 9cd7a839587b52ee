use crate::http::{ApiError, ApiErrorCode};
use crate::{sha256_hex, AppState, CRATE_NAME};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use taxmap_model::{Page, Record, PAGES};
use taxmap_query::{annotate_labels, build_figure, resolve_details};

const HOME_DATASET_URL: &str = "https://www.dropbox.com/scl/fi/96xj7ggkjcyqmu79s1btk/Updated_Filtered_Restaurants.parquet?rlkey=jeiq7o5buzqsnvplnbu1qjdh7&dl=0";
const HOME_TITLE: &str = "Welcome to the Restaurant Tax Compliance Dashboard";

fn api_error_response(status: StatusCode, err: ApiError) -> Response {
    let body = Json(json!({"error": err}));
    (status, body).into_response()
}

fn error_json(code: ApiErrorCode, message: &str, details: Value) -> ApiError {
    ApiError::new(code, message, details)
}

fn if_none_match(headers: &HeaderMap) -> Option<String> {
    headers
        .get("if-none-match")
        .and_then(|v| v.to_str().ok())
        .map(std::string::ToString::to_string)
}

fn put_cache_headers(headers: &mut HeaderMap, ttl: Duration, etag: &str) {
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", ttl.as_secs())) {
        headers.insert("cache-control", value);
    }
    if let Ok(value) = HeaderValue::from_str(etag) {
        headers.insert("etag", value);
    }
}

fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

fn propagated_request_id(headers: &HeaderMap, state: &AppState) -> String {
    if let Some(raw) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    make_request_id(state)
}

fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(v) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", v);
    }
    response
}

fn etag_for(body: &str) -> String {
    format!("\"{}\"", sha256_hex(body.as_bytes()))
}

/// Serves a JSON body with etag revalidation: a matching `If-None-Match`
/// short-circuits to 304 with the same cache headers.
fn cached_json_response(body: &Value, headers: &HeaderMap, ttl: Duration) -> (StatusCode, Response) {
    let text = body.to_string();
    let etag = etag_for(&text);
    if if_none_match(headers).as_deref() == Some(etag.as_str()) {
        let mut resp = StatusCode::NOT_MODIFIED.into_response();
        put_cache_headers(resp.headers_mut(), ttl, &etag);
        return (StatusCode::NOT_MODIFIED, resp);
    }
    let mut resp = (
        StatusCode::OK,
        [("content-type", "application/json")],
        text,
    )
        .into_response();
    put_cache_headers(resp.headers_mut(), ttl, &etag);
    (StatusCode::OK, resp)
}

pub(crate) async fn landing_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let mut page_links = String::new();
    for page in PAGES {
        page_links.push_str(&format!(
            "<li><a href=\"/v1/pages/{}\">{}</a></li>\n",
            page.as_str(),
            page.display_label()
        ));
    }
    let body = format!(
        "<!doctype html>\n<html>\n<head><title>{HOME_TITLE}</title></head>\n<body>\n\
         <h1>{HOME_TITLE}</h1>\n\
         <p>Use the page links below to navigate the compliance maps.</p>\n\
         <ul>\n{page_links}</ul>\n\
         <p>Link to access dataset: <a href=\"{HOME_DATASET_URL}\">Dataset</a></p>\n\
         <p>API: <a href=\"/v1/pages\">/v1/pages</a>, <a href=\"/v1/version\">/v1/version</a></p>\n\
         </body>\n</html>\n"
    );
    let resp = Html(body).into_response();
    state
        .metrics
        .observe_request("/", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn healthz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let resp = (StatusCode::OK, "ok").into_response();
    state
        .metrics
        .observe_request("/healthz", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn readyz_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let ready = state.ready.load(Ordering::Relaxed) && state.accepting_requests.load(Ordering::Relaxed);
    let (status, body) = if ready {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not-ready")
    };
    let resp = (status, body).into_response();
    state
        .metrics
        .observe_request("/readyz", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    crate::telemetry::metrics_handler(State(state)).await
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    let request_id = make_request_id(&state);
    let started = Instant::now();
    let payload = json!({
        "server": {
            "crate": CRATE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
            "config_schema_version": crate::config::CONFIG_SCHEMA_VERSION,
        },
        "dataset": {
            "source": state.dataset.source.as_str(),
            "rows": state.dataset.len(),
        }
    });
    let mut response = Json(payload).into_response();
    if let Ok(value) = HeaderValue::from_str("public, max-age=30") {
        response.headers_mut().insert("cache-control", value);
    }
    state
        .metrics
        .observe_request("/v1/version", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(response, &request_id)
}

pub(crate) async fn pages_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    let started = Instant::now();
    let pages: Vec<Value> = PAGES
        .iter()
        .map(|page| {
            json!({
                "page": page.as_str(),
                "label": page.display_label(),
                "kind": match page.plan() {
                    Some(plan) => json!({
                        "segment": plan.segment.as_str(),
                        "scheme": plan.scheme.as_str(),
                    }),
                    None => Value::Null,
                },
            })
        })
        .collect();
    let body = json!({ "pages": pages });
    let (status, resp) = cached_json_response(&body, &headers, state.api.discovery_ttl);
    state
        .metrics
        .observe_request("/v1/pages", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

fn home_payload() -> Value {
    json!({
        "page": Page::Home.as_str(),
        "title": HOME_TITLE,
        "message": "Use the page links to navigate through different pages.",
        "dataset_url": HOME_DATASET_URL,
    })
}

fn map_page_payload(state: &AppState, page: Page) -> Option<Value> {
    let plan = page.plan()?;
    let segment = state.segments.segment(plan.segment);
    let figure = build_figure(&state.dataset, segment, plan.scheme);
    let labels = annotate_labels(&state.dataset, segment, plan.scheme);
    let labels_json: Value = labels
        .iter()
        .map(|(code, label)| (code.to_string(), Value::from(label.as_str())))
        .collect::<serde_json::Map<String, Value>>()
        .into();
    Some(json!({
        "page": page.as_str(),
        "segment": {
            "kind": plan.segment.as_str(),
            "cutoff": state.segments.cutoff.format("%Y-%m-%d %H:%M:%S").to_string(),
            "row_count": segment.len(),
        },
        "labels": labels_json,
        "figure": figure,
    }))
}

pub(crate) async fn page_handler(
    State(state): State<AppState>,
    Path(page): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    let started = Instant::now();
    let Some(parsed) = Page::parse(&page) else {
        let err = error_json(
            ApiErrorCode::UnknownPage,
            "unknown page",
            json!({"page": page, "known": PAGES.iter().map(|p| p.as_str()).collect::<Vec<_>>()}),
        );
        let resp = api_error_response(StatusCode::NOT_FOUND, err);
        state
            .metrics
            .observe_request("/v1/pages/{page}", StatusCode::NOT_FOUND, started.elapsed())
            .await;
        return with_request_id(resp, &request_id);
    };
    let body = match map_page_payload(&state, parsed) {
        Some(body) => body,
        None => home_payload(),
    };
    let (status, resp) = cached_json_response(&body, &headers, state.api.page_ttl);
    state
        .metrics
        .observe_request("/v1/pages/{page}", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn record_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    let started = Instant::now();
    let Some(record) = state.dataset.find_by_id(&id) else {
        let err = error_json(
            ApiErrorCode::RecordNotFound,
            "record not found",
            json!({"id": id}),
        );
        let resp = api_error_response(StatusCode::NOT_FOUND, err);
        state
            .metrics
            .observe_request(
                "/v1/records/{id}",
                StatusCode::NOT_FOUND,
                started.elapsed(),
            )
            .await;
        return with_request_id(resp, &request_id);
    };
    let body = json!({
        "record": record,
        "details": resolve_details(Some(record)),
    });
    let (status, resp) = cached_json_response(&body, &headers, state.api.page_ttl);
    state
        .metrics
        .observe_request("/v1/records/{id}", status, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

pub(crate) async fn selection_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<Value>, JsonRejection>,
) -> impl IntoResponse {
    let request_id = propagated_request_id(&headers, &state);
    let started = Instant::now();
    // Bodies that are not JSON at all still get the error envelope.
    let Json(body) = match body {
        Ok(json) => json,
        Err(rejection) => {
            let err = error_json(
                ApiErrorCode::InvalidSelection,
                "selection body is not valid JSON",
                json!({"reason": rejection.body_text()}),
            );
            let resp = api_error_response(StatusCode::BAD_REQUEST, err);
            state
                .metrics
                .observe_request(
                    "/v1/selection",
                    StatusCode::BAD_REQUEST,
                    started.elapsed(),
                )
                .await;
            return with_request_id(resp, &request_id);
        }
    };
    let selection = body.get("record").cloned().unwrap_or(Value::Null);
    let view = if selection.is_null() {
        resolve_details(None)
    } else {
        match serde_json::from_value::<Record>(selection) {
            Ok(record) => resolve_details(Some(&record)),
            Err(e) => {
                let err = error_json(
                    ApiErrorCode::InvalidSelection,
                    "selection payload is not a record",
                    json!({"reason": e.to_string()}),
                );
                let resp = api_error_response(StatusCode::BAD_REQUEST, err);
                state
                    .metrics
                    .observe_request(
                        "/v1/selection",
                        StatusCode::BAD_REQUEST,
                        started.elapsed(),
                    )
                    .await;
                return with_request_id(resp, &request_id);
            }
        }
    };
    let resp = Json(json!({"details": view})).into_response();
    state
        .metrics
        .observe_request("/v1/selection", StatusCode::OK, started.elapsed())
        .await;
    with_request_id(resp, &request_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn etag_is_quoted_and_stable() {
        let a = etag_for("{\"k\":1}");
        let b = etag_for("{\"k\":1}");
        assert_eq!(a, b);
        assert!(a.starts_with('"') && a.ends_with('"'));
    }

    #[test]
    fn home_payload_names_the_dataset_link() {
        let body = home_payload();
        assert_eq!(body["page"], "home");
        assert!(body["dataset_url"]
            .as_str()
            .is_some_and(|u| u.contains("Updated_Filtered_Restaurants.parquet")));
    }
}
