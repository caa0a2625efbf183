//! Page renderer
//!
//! Serves `<template_dir>/index.html` as-is. Without a template the embedded
//! page is served, so `/` always answers 200.

use hyper::body::Bytes;
use tokio::fs;

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http::{self, HttpResponse};
use crate::logger;

const DEFAULT_PAGE: &str = include_str!("index.html");

pub async fn serve_index(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    let html = match fs::read(&state.template_path).await {
        Ok(content) => Bytes::from(content),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                logger::log_warning(&format!(
                    "Failed to read template '{}': {e}, serving built-in page",
                    state.template_path.display()
                ));
            }
            Bytes::from_static(DEFAULT_PAGE.as_bytes())
        }
    };

    http::build_html_response(html, ctx.is_head)
}
