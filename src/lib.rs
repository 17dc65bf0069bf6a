/// Blog Service Library
///
/// Handles posts, groups, comments, follows and feed assembly for a small
/// publishing platform. Feed composition is the core: given a viewer, a
/// scope (all posts / one group / one author / followed authors) and a
/// 1-based page number, produce an ordered, paginated slice of posts with
/// supporting counts.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers
/// - `models`: Data structures for posts, groups, comments, follows
/// - `services`: Business logic layer (feed assembly, mutation gates)
/// - `db`: Database access layer and repositories
/// - `cache`: Listing cache and invalidation
/// - `middleware`: HTTP middleware for identity extraction and the auth gate
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Observability and metrics collection
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
