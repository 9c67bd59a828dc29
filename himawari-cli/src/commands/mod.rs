//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`fetch`] - Download and save a full-disk image
//! - [`latest`] - Print the newest observation time
//! - [`url`] - Print the address of one tile

pub mod common;
pub mod fetch;
pub mod latest;
pub mod url;
