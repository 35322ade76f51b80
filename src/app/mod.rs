//! Application orchestration: state, input handling and the editor commands.

pub mod actions;
pub mod dialog;
pub mod event;
pub mod handler;
pub mod settings;
pub mod state;
