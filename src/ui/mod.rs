//! Rendering layer.  Everything that touches Ratatui widgets lives here.
//!
//! This layer takes the application state and turns it into cells on the
//! terminal.  No filesystem I/O happens here.

pub mod editor_widget;
pub mod layout;
pub mod popup;
pub mod theme;
pub mod toolbar;
