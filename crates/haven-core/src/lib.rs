//! Core types and trait definitions for the Haven safety service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod alert;
pub mod contact;
pub mod error;
pub mod guide;
pub mod option;
pub mod query;
pub mod request;
pub mod sos;
pub mod store;
pub mod tip;
pub mod user;
pub mod validate;

pub use error::{Error, Result};
