//! Jiraa issue tracker integration
//!
//! Client library for looking up a single issue by key.

pub mod auth;
pub mod client;
pub mod error;
pub mod types;

pub use client::TrackerClient;
pub use error::{LookupError, Result, UnexpectedCause};
pub use types::*;
