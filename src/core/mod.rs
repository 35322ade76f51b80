//! Core document logic: JSON call-through, file I/O, the text buffer and
//! the dialog's directory listing.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod buffer;
pub mod document;
pub mod error;
pub mod fs;
pub mod json;
