// src/lib.rs
//! sked timetable exports → iCalendar.
//!
//! `core` turns one schedule document into events, `specs` knows the page
//! layouts, `runner` drives a whole export, `ics`/`file` write the results and
//! `site` renders a static listing over them.

#[macro_use]
pub mod macros;

pub mod config;
pub mod core;
pub mod error;
pub mod logging;
pub mod progress;
pub mod source;
pub mod specs;

pub mod file;
pub mod ics;
pub mod runner;
pub mod site;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};
