/// Listing cache layer
///
/// Redis-backed caching of rendered global feed pages with a bounded TTL
/// and explicit invalidation on post mutation. Stale reads inside the TTL
/// window are tolerated by design.
mod feed_cache;

pub use feed_cache::FeedCache;
