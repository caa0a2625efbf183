//! Request handler module
//!
//! Routing plus the three things the server answers with: sampled dog data,
//! the visualization page and static assets.

pub mod data;
pub mod page;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
