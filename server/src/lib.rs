//! Serves an interactive map of Amsterdam buildings, colored by how much a fire in each one
//! would affect the surroundings: neighboring buildings, roads, and public transport.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod config;
mod cors;
mod error;
mod pages;
mod router;
mod templates;

pub use crate::config::{App, Flags};
pub use crate::cors::parse_origin;
pub use crate::error::PageError;
pub use crate::router::{handle, serve, serve_req, Route};
