//! # xpanel Common Library
//!
//! Shared code for the xpanel web panel:
//! - Error type used by every layer
//! - Root folder and TOML configuration loading
//! - Database initialization (settings and users tables)
//! - Host connection counting

pub mod config;
pub mod db;
pub mod error;
pub mod sys;

pub use error::{Error, Result};
