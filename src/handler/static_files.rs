//! Static file serving module
//!
//! Serves the static root (dog images, page scripts) with MIME detection,
//! `ETag` revalidation and single byte ranges.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime, HttpResponse, RangeParseResult};
use crate::logger;
use hyper::body::Bytes;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Serve static files from a directory
pub async fn serve_directory(
    ctx: &RequestContext<'_>,
    dir: &str,
    route_prefix: &str,
    index_files: &[String],
) -> HttpResponse {
    match load_from_directory(dir, ctx.path, route_prefix, index_files).await {
        Some((content, content_type)) => build_static_file_response(
            Bytes::from(content),
            content_type,
            ctx.if_none_match,
            ctx.is_head,
            ctx.range_header,
        ),
        None => http::build_404_response(),
    }
}

/// Load static file from directory with index file support
///
/// The request path is percent-decoded, `..` segments are refused and the
/// resolved file must stay inside the canonical static root.
pub async fn load_from_directory(
    static_dir: &str,
    path: &str,
    route_prefix: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    let encoded = path.strip_prefix(route_prefix).unwrap_or(path);
    let Ok(decoded) = percent_decode_str(encoded).decode_utf8() else {
        logger::log_warning(&format!("Rejected non UTF-8 path: {path}"));
        return None;
    };
    let Some(relative) = sanitize_relative(&decoded) else {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return None;
    };

    let root = Path::new(static_dir);
    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = root.join(relative);
    if is_dir(&file_path).await {
        let mut found = None;
        for index_file in index_files {
            let candidate = file_path.join(index_file);
            if is_file(&candidate).await {
                found = Some(candidate);
                break;
            }
        }
        file_path = found?;
    }

    // Missing files are ordinary 404s, not worth a warning
    let file_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path escapes static root: {} -> {}",
            path,
            file_canonical.display()
        ));
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    Some((content, mime::content_type_for(&file_path)))
}

/// Relative path made of plain segments, or `None` if any segment climbs out
fn sanitize_relative(relative: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => clean.push(s),
        }
    }
    Some(clean)
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn is_file(path: &Path) -> bool {
    fs::metadata(path).await.is_ok_and(|m| m.is_file())
}

/// Build static file response with `ETag` and Range support
fn build_static_file_response(
    data: Bytes,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
    range_header: Option<&str>,
) -> HttpResponse {
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    match http::parse_range_header(range_header, data.len()) {
        RangeParseResult::Valid(range) => http::response::build_partial_response(
            &data,
            content_type,
            &etag,
            range,
            is_head,
        ),
        RangeParseResult::NotSatisfiable => http::build_416_response(data.len()),
        RangeParseResult::None => {
            http::response::build_cached_response(data, content_type, &etag, is_head)
        }
    }
}
