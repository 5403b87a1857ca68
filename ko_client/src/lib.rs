//! Internal modules for the bracket client.
//!
//! This library provides key mapping, bracket drawing, logging setup, and
//! the terminal app used by the ko_client binary.

pub mod bracket_view;
pub mod commands;
pub mod logging;
pub mod tui_app;
