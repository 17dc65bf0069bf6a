/// Business logic layer
///
/// - `feed`: scope resolution + pagination + listing cache read-through
/// - `posts`: post creation, author-gated editing, detail, comments
/// - `follow`: follow/unfollow toggle
/// - `pagination`: pure page windowing shared by every listing
pub mod feed;
pub mod follow;
pub mod pagination;
pub mod posts;

pub use feed::FeedService;
pub use follow::{FollowChange, FollowService};
pub use posts::{EditOutcome, EditPost, NewPost, PostService};
