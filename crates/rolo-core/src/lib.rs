//! Core types and trait definitions for the Rolo address book.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod contact;
pub mod error;
pub mod session;
pub mod store;

pub use error::{Error, Result};
