//! Odds and ends shared by the rest of the workspace:
//!
//! - Timer (a mix of logging and profiling)
//! - Counter (a tally of sortable things)
//! - logger setup

#[macro_use]
extern crate log;

mod collections;
pub mod logger;
mod time;

pub use crate::collections::Counter;
pub use crate::time::{elapsed_seconds, prettyprint_time, prettyprint_usize, Timer};

/// Capitalizes the first letter of a string, leaving the rest alone.
pub fn capitalize(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
