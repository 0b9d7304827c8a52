//! # Yatube Core
//!
//! The domain layer of Yatube: posts, groups, comments and follow edges.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod forms;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use pagination::{Page, PageRequest, POSTS_PER_PAGE};
