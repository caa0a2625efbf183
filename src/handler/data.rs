//! `/get_dog_data` handler

use hyper::StatusCode;

use crate::config::AppState;
use crate::dataset;
use crate::handler::router::RequestContext;
use crate::http::{self, HttpResponse};
use crate::logger;

/// Re-read the backing file, sample it and answer with a JSON array.
/// Any dataset failure becomes a 500; there is no fallback data.
pub async fn serve_dog_data(ctx: &RequestContext<'_>, state: &AppState) -> HttpResponse {
    match dataset::load_sample(&state.dataset_path).await {
        Ok(sample) => {
            logger::log_sample_served(sample.records.len(), sample.total_rows);
            http::build_json_response(StatusCode::OK, &sample.records, ctx.is_head)
        }
        Err(err) => {
            logger::log_dataset_error(&err);
            http::build_json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("dataset unavailable: {err}"),
                ctx.is_head,
            )
        }
    }
}
