//! Domain entities - the core business objects.

mod comment;
mod follow;
mod group;
pub mod image;
mod post;
mod user;

pub use comment::Comment;
pub use follow::Follow;
pub use group::{Group, SLUG_MAX_LEN, TITLE_MAX_LEN};
pub use image::ImageFormat;
pub use post::Post;
pub use user::{USERNAME_MAX_LEN, User};
