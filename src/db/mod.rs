/// Database access layer
///
/// Per-entity repositories in the same shape throughout: free async
/// functions over `&PgPool`, returning row or view structs. Every post
/// listing orders by `created_at DESC, id DESC`.
pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod user_repo;
