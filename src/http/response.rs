//! HTTP response building module
//!
//! Builders for the status codes the server emits. Builder failures are logged
//! and replaced with a bare response so request handling never panics.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use serde::Serialize;

use super::cache::{CachePolicy, STATIC_ASSETS};
use super::range::ByteRange;

pub type HttpResponse = Response<Full<Bytes>>;

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> HttpResponse {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", STATIC_ASSETS.to_header_value())
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> HttpResponse {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> HttpResponse {
    let mut resp = build_text_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    resp.headers_mut().insert(
        hyper::header::ALLOW,
        hyper::header::HeaderValue::from_static("GET, HEAD, OPTIONS"),
    );
    resp
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> HttpResponse {
    build_text_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(body_len: usize) -> HttpResponse {
    Response::builder()
        .status(416)
        .header("Content-Type", "text/plain")
        .header("Content-Range", format!("bytes */{body_len}"))
        .body(Full::new(Bytes::from("Range Not Satisfiable")))
        .unwrap_or_else(|e| {
            log_build_error("416", &e);
            Response::new(Full::new(Bytes::from("Range Not Satisfiable")))
        })
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> HttpResponse {
    let mut builder = Response::builder()
        .status(204)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type, Range")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Plain-text body for probes and errors
pub fn build_text_response(status: StatusCode, text: &'static str) -> HttpResponse {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", CachePolicy::NoStore.to_header_value())
        .body(Full::new(Bytes::from_static(text.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from_static(text.as_bytes())))
        })
}

/// HTML page, revalidated on every load
pub fn build_html_response(content: Bytes, is_head: bool) -> HttpResponse {
    build_body_response(
        StatusCode::OK,
        "text/html; charset=utf-8",
        CachePolicy::NoCache,
        content,
        is_head,
    )
}

/// Serialize `body` as a JSON response that is never cached
pub fn build_json_response<T: Serialize + ?Sized>(
    status: StatusCode,
    body: &T,
    is_head: bool,
) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(json) => build_body_response(
            status,
            "application/json",
            CachePolicy::NoStore,
            Bytes::from(json),
            is_head,
        ),
        Err(e) => {
            crate::logger::log_error(&format!("Failed to serialize response: {e}"));
            build_json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                is_head,
            )
        }
    }
}

/// `{"error": message}` with the given status
pub fn build_json_error(status: StatusCode, message: &str, is_head: bool) -> HttpResponse {
    let body = serde_json::json!({ "error": message });
    build_body_response(
        status,
        "application/json",
        CachePolicy::NoStore,
        Bytes::from(body.to_string()),
        is_head,
    )
}

/// Full static file response with cache validators
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> HttpResponse {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .header("Cache-Control", STATIC_ASSETS.to_header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 206 Partial Content response; `data` is the whole file
pub fn build_partial_response(
    data: &Bytes,
    content_type: &str,
    etag: &str,
    range: ByteRange,
    is_head: bool,
) -> HttpResponse {
    let body = if is_head {
        Bytes::new()
    } else {
        data.slice(range.start..=range.end)
    };

    Response::builder()
        .status(206)
        .header("Content-Type", content_type)
        .header("Content-Length", range.content_length())
        .header(
            "Content-Range",
            format!("bytes {}-{}/{}", range.start, range.end, data.len()),
        )
        .header("Accept-Ranges", "bytes")
        .header("ETag", etag)
        .header("Cache-Control", STATIC_ASSETS.to_header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("206", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

fn build_body_response(
    status: StatusCode,
    content_type: &str,
    policy: CachePolicy,
    content: Bytes,
    is_head: bool,
) -> HttpResponse {
    let content_length = content.len();
    let body = if is_head { Bytes::new() } else { content };

    Response::builder()
        .status(status)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Cache-Control", policy.to_header_value())
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(resp: HttpResponse) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_json_response() {
        let resp = build_json_response(StatusCode::OK, &[1, 2, 3], false);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");
        assert_eq!(resp.headers()["Cache-Control"], "no-store");
        assert_eq!(body_bytes(resp).await, Bytes::from("[1,2,3]"));
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = build_json_response(StatusCode::OK, &["abc"], true);
        assert_eq!(resp.headers()["Content-Length"], "7");
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_json_error() {
        let resp = build_json_error(StatusCode::INTERNAL_SERVER_ERROR, "boom", false);
        assert_eq!(resp.status(), 500);
        let value: serde_json::Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
        assert_eq!(value["error"], "boom");
    }

    #[tokio::test]
    async fn test_json_error_head() {
        let resp = build_json_error(StatusCode::INTERNAL_SERVER_ERROR, "boom", true);
        assert_eq!(resp.status(), 500);
        assert_eq!(resp.headers()["Content-Length"], "16");
        assert!(body_bytes(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_partial_response() {
        let data = Bytes::from_static(b"0123456789");
        let resp = build_partial_response(
            &data,
            "text/plain",
            "\"e\"",
            ByteRange { start: 2, end: 4 },
            false,
        );
        assert_eq!(resp.status(), 206);
        assert_eq!(resp.headers()["Content-Range"], "bytes 2-4/10");
        assert_eq!(resp.headers()["Content-Length"], "3");
        assert_eq!(body_bytes(resp).await, Bytes::from_static(b"234"));
    }

    #[test]
    fn test_405_allow_header() {
        let resp = build_405_response();
        assert_eq!(resp.status(), 405);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_options_cors() {
        let resp = build_options_response(true);
        assert_eq!(resp.status(), 204);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
        assert!(build_options_response(false)
            .headers()
            .get("Access-Control-Allow-Origin")
            .is_none());
    }
}
