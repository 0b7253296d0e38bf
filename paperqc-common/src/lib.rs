//! # paperqc Common Library
//!
//! Shared code for the paperqc services:
//! - Error taxonomy and `Result` alias
//! - Configuration loading and data-folder resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
