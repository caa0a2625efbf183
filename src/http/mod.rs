//! HTTP protocol layer module
//!
//! Protocol helpers shared by the data endpoint, the page and static assets,
//! independent of what the handlers serve.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use range::{parse_range_header, RangeParseResult};
pub use response::{
    build_304_response, build_404_response, build_405_response, build_413_response,
    build_416_response, build_html_response, build_json_error, build_json_response,
    build_options_response, build_text_response, HttpResponse,
};
