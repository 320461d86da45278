//! Core types and the submission intake pipeline.
//!
//! This crate knows nothing about HTTP, SQL or SMTP. Storage and mail
//! delivery are reached through the [`store::IntakeStore`] and
//! [`notify::MailTransport`] traits, implemented by the backend crates.

// Trait futures declare their `Send` bounds explicitly.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod notify;
pub mod rate_limit;
pub mod service;
pub mod status;
pub mod store;
pub mod submission;

pub use error::{Error, Result};

#[cfg(test)]
mod testing;
