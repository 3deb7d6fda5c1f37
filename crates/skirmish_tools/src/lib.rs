//! # Skirmish Development Tools
//!
//! Command-line tools for development:
//! - Data validators
//! - ASCII board viewer
//! - Move and action range viewer

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod board;
pub mod error;
pub mod load;
pub mod validate;
