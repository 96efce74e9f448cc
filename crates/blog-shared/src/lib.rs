//! # Blog Shared
//!
//! Wire types shared by the server and its clients: form payloads, query
//! strings and the problem-details error body.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
