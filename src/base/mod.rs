//! Foundation types for the protoscope toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`FileId`] - Interned file identifiers
//!
//! This module has NO dependencies on other protoscope modules.

mod file_id;

pub use file_id::FileId;
