//! Use cases on top of the ports: listings, authoring, comments, follows.

mod comments;
mod follows;
mod posts;

pub use comments::CommentService;
pub use follows::FollowService;
pub use posts::{
    CommentEntry, GroupListing, POST_IMAGE_DIR, PostDetail, PostEntry, PostService,
    ProfileListing,
};
