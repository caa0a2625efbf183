//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, body limits,
//! route matching, `Server` header and access logging.

use crate::config::AppState;
use crate::handler::{data, page, static_files};
use crate::http::{self, HttpResponse};
use crate::logger::{self, AccessLogEntry};
use hyper::body::Body as _;
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

pub const DATA_PATH: &str = "/get_dog_data";
pub const STATIC_PREFIX: &str = "/static";
pub const LIVENESS_PATH: &str = "/healthz";
pub const READINESS_PATH: &str = "/readyz";

/// Request details the route handlers need
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<&'a str>,
    pub range_header: Option<&'a str>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<HttpResponse, Infallible> {
    let started = Instant::now();
    let method = req.method();
    let headers = req.headers();

    let mut response = if let Some(resp) = check_http_method(method, state.config.http.enable_cors)
    {
        resp
    } else if let Some(resp) = check_body_size(headers, state.config.http.max_body_size) {
        resp
    } else {
        logger::log_headers_count(headers.len(), state.config.logging.show_headers);

        let ctx = RequestContext {
            path: req.uri().path(),
            is_head: *method == Method::HEAD,
            if_none_match: header_str(headers, "if-none-match"),
            range_header: header_str(headers, "range"),
        };
        route_request(&ctx, &state).await
    };

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            req.uri().path().to_string(),
        );
        entry.query = req.uri().query().map(ToString::to_string);
        entry.http_version = http_version(req.version()).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.referer = header_str(headers, "referer").map(ToString::to_string);
        entry.user_agent = header_str(headers, "user-agent").map(ToString::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_str<'a>(headers: &'a hyper::HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn http_version(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<HttpResponse> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &hyper::HeaderMap, max_body_size: u64) -> Option<HttpResponse> {
    let size_str = header_str(headers, "content-length")?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(http::build_413_response())
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}

/// Route request based on path
pub async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    match ctx.path {
        LIVENESS_PATH => http::build_text_response(StatusCode::OK, "ok"),
        READINESS_PATH => readiness(state).await,
        DATA_PATH => data::serve_dog_data(ctx, state).await,
        "/" => page::serve_index(ctx, state).await,
        path if is_static_path(path) => {
            static_files::serve_directory(
                ctx,
                &state.config.assets.static_dir,
                STATIC_PREFIX,
                &state.config.assets.index_files,
            )
            .await
        }
        _ => http::build_404_response(),
    }
}

fn is_static_path(path: &str) -> bool {
    path.strip_prefix(STATIC_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Ready once the backing file is present
async fn readiness(state: &AppState) -> HttpResponse {
    match tokio::fs::metadata(&state.dataset_path).await {
        Ok(meta) if meta.is_file() => http::build_text_response(StatusCode::OK, "ok"),
        _ => http::build_text_response(StatusCode::SERVICE_UNAVAILABLE, "dataset unavailable"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use crate::dataset::fixtures::{generated_csv, temp_dir, EXAMPLE_CSV};
    use http_body_util::BodyExt;
    use hyper::body::Bytes;

    fn state_with(dir: &std::path::Path) -> AppState {
        AppState::new(&test_config(dir.to_str().unwrap()))
    }

    fn get(path: &str) -> RequestContext<'_> {
        RequestContext {
            path,
            is_head: false,
            if_none_match: None,
            range_header: None,
        }
    }

    async fn body_bytes(resp: HttpResponse) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    async fn json_array(resp: HttpResponse) -> Vec<serde_json::Value> {
        let value: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        value.as_array().unwrap().clone()
    }

    #[tokio::test]
    async fn test_dog_data_example() {
        let dir = temp_dir("router-example");
        std::fs::write(dir.join("dog_output_file.csv"), EXAMPLE_CSV).unwrap();
        let state = state_with(&dir);

        let resp = route_request(&get(DATA_PATH), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");

        let records = json_array(resp).await;
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            serde_json::json!({
                "image_url": "/static/dogs/a.jpg",
                "x": 1.0,
                "y": 2.0,
                "class_name": "Beagle",
                "labels": "Beagle",
            })
        );
    }

    #[tokio::test]
    async fn test_dog_data_bounded_and_repeatable() {
        let dir = temp_dir("router-large");
        std::fs::write(dir.join("dog_output_file.csv"), generated_csv(750)).unwrap();
        let state = state_with(&dir);

        let first = json_array(route_request(&get(DATA_PATH), &state).await).await;
        let second = json_array(route_request(&get(DATA_PATH), &state).await).await;
        assert_eq!(first.len(), 500);
        assert_eq!(first, second);

        for record in &first {
            assert_eq!(record["class_name"], record["labels"]);
            let url = record["image_url"].as_str().unwrap();
            let label = record["labels"].as_str().unwrap();
            assert!(url.starts_with(&format!("/static/dogs/{label}/")));
        }
    }

    #[tokio::test]
    async fn test_dog_data_small_file_returns_all_rows() {
        let dir = temp_dir("router-small");
        std::fs::write(dir.join("dog_output_file.csv"), generated_csv(42)).unwrap();
        let state = state_with(&dir);

        let records = json_array(route_request(&get(DATA_PATH), &state).await).await;
        assert_eq!(records.len(), 42);
    }

    #[tokio::test]
    async fn test_dog_data_empty_dataset() {
        let dir = temp_dir("router-empty");
        std::fs::write(dir.join("dog_output_file.csv"), "filepaths,x,y,labels\n").unwrap();
        let state = state_with(&dir);

        let resp = route_request(&get(DATA_PATH), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(body_bytes(resp).await, Bytes::from("[]"));
    }

    #[tokio::test]
    async fn test_dog_data_missing_file_is_server_error() {
        let dir = temp_dir("router-missing");
        let state = state_with(&dir);

        let resp = route_request(&get(DATA_PATH), &state).await;
        assert_eq!(resp.status(), 500);
        let value: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert!(value["error"].as_str().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn test_dog_data_missing_labels_is_server_error() {
        let dir = temp_dir("router-no-labels");
        std::fs::write(dir.join("dog_output_file.csv"), "filepaths,x,y\na.jpg,1,2\n").unwrap();
        let state = state_with(&dir);

        let resp = route_request(&get(DATA_PATH), &state).await;
        assert_eq!(resp.status(), 500);
        let value: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert!(value["error"].as_str().unwrap().contains("labels"));
    }

    #[tokio::test]
    async fn test_dog_data_non_finite_coordinate_is_server_error() {
        let dir = temp_dir("router-nan");
        std::fs::write(
            dir.join("dog_output_file.csv"),
            "filepaths,x,y,labels\na.jpg,NaN,inf,Pug\n",
        )
        .unwrap();
        let state = state_with(&dir);

        let resp = route_request(&get(DATA_PATH), &state).await;
        assert_eq!(resp.status(), 500);
        let value: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert!(value["error"].as_str().unwrap().contains("finite"));
    }

    #[tokio::test]
    async fn test_dog_data_head() {
        let dir = temp_dir("router-head");
        let state = state_with(&dir);
        let head = RequestContext {
            is_head: true,
            ..get(DATA_PATH)
        };

        // missing file: 500 with headers only
        let resp = route_request(&head, &state).await;
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
        assert!(body_bytes(resp).await.is_empty());

        std::fs::write(dir.join("dog_output_file.csv"), EXAMPLE_CSV).unwrap();
        let full_len = body_bytes(route_request(&get(DATA_PATH), &state).await)
            .await
            .len();
        let resp = route_request(&head, &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], full_len.to_string().as_str());
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_index_html_is_not_an_alias() {
        let dir = temp_dir("router-index-alias");
        let state = state_with(&dir);
        assert_eq!(route_request(&get("/index.html"), &state).await.status(), 404);
    }

    #[tokio::test]
    async fn test_index_page_default() {
        let dir = temp_dir("router-index");
        let state = state_with(&dir);

        let resp = route_request(&get("/"), &state).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
        let html = String::from_utf8(body_bytes(resp).await.to_vec()).unwrap();
        assert!(html.contains(DATA_PATH));
    }

    #[tokio::test]
    async fn test_index_page_from_template() {
        let dir = temp_dir("router-template");
        std::fs::create_dir_all(dir.join("templates")).unwrap();
        std::fs::write(dir.join("templates/index.html"), "<p>custom</p>").unwrap();
        let state = state_with(&dir);

        let resp = route_request(&get("/"), &state).await;
        assert_eq!(body_bytes(resp).await, Bytes::from("<p>custom</p>"));
    }

    #[tokio::test]
    async fn test_health_probes() {
        let dir = temp_dir("router-health");
        let state = state_with(&dir);

        assert_eq!(route_request(&get(LIVENESS_PATH), &state).await.status(), 200);
        assert_eq!(route_request(&get(READINESS_PATH), &state).await.status(), 503);

        std::fs::write(dir.join("dog_output_file.csv"), EXAMPLE_CSV).unwrap();
        assert_eq!(route_request(&get(READINESS_PATH), &state).await.status(), 200);
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let dir = temp_dir("router-unknown");
        let state = state_with(&dir);
        assert_eq!(route_request(&get("/nope"), &state).await.status(), 404);
        assert_eq!(route_request(&get("/staticfoo"), &state).await.status(), 404);
    }

    #[test]
    fn test_check_http_method() {
        assert!(check_http_method(&Method::GET, false).is_none());
        assert!(check_http_method(&Method::HEAD, false).is_none());
        assert_eq!(check_http_method(&Method::OPTIONS, false).unwrap().status(), 204);
        assert_eq!(check_http_method(&Method::POST, false).unwrap().status(), 405);
    }

    #[test]
    fn test_check_body_size() {
        let mut headers = hyper::HeaderMap::new();
        assert!(check_body_size(&headers, 10).is_none());
        headers.insert("content-length", HeaderValue::from_static("11"));
        assert_eq!(check_body_size(&headers, 10).unwrap().status(), 413);
        headers.insert("content-length", HeaderValue::from_static("abc"));
        assert!(check_body_size(&headers, 10).is_none());
    }

    #[test]
    fn test_is_static_path() {
        assert!(is_static_path("/static"));
        assert!(is_static_path("/static/dogs/a.jpg"));
        assert!(!is_static_path("/statics/a.jpg"));
    }
}
