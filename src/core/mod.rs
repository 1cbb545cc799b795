// src/core/mod.rs
//! Timetable core: table model, span grid, header dates, cell text, events, series.
//! Everything here is pure and synchronous; nothing in `core` touches the filesystem.

pub mod cell_text;
pub mod dates;
pub mod event;
pub mod grid;
pub mod html;
pub mod sanitize;
pub mod series;
pub mod table;

pub use event::{Event, ZoneId};
pub use table::{CellKind, RawCell, Table};
