//! Jiraa core
//!
//! Domain models and settings storage shared by the daemon and its clients.

pub mod error;
pub mod models;
pub mod storage;

pub use error::{Error, Result};
