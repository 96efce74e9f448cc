//! # Blog Core
//!
//! The domain layer of the blog.
//! This crate contains the post and account rules, the ownership policy and
//! the services built on top of them, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod policy;
pub mod ports;
pub mod services;

pub use error::DomainError;
