// src/specs/mod.rs
//! # Page specs
//!
//! One module per page type of a sked export. Each spec knows *where the ground
//! truth lives in the HTML* and turns a document into plain data; nothing here
//! loads files, writes calendars or aggregates across documents.
//!
//! - `index` – the overview page: which schedule documents exist and under which
//!   course name.
//! - `schedule` – a schedule detail page: week tables → events.
//!
//! ## Typical call chain
//! ```text
//! runner → source::load → specs::index::harvest_links   (overview)
//!        → source::load → specs::schedule::parse_doc    (per course)
//!        → core::series::SeriesAggregator → ics
//! ```
//!
//! Specs are testable offline against inline fixtures.
pub mod index;
pub mod schedule;
