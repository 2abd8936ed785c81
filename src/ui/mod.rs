//! Plain console output for build logs
//!
//! Build steps run non-interactively, so everything here is line-oriented
//! and relies on `console` to drop colors when stdout is not a terminal.

mod output;

pub use output::{command, key_value, section, step_info, step_ok, step_warn};
