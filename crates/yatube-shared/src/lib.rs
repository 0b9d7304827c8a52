//! # Yatube Shared
//!
//! Serializable page contexts and error documents shared by the server and its clients.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
