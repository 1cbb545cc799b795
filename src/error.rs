// src/error.rs
//! Errors of the I/O layers (loading, fetching, harvesting, exporting, config).
//!
//! The parsing core never fails: anything it cannot map is skipped and logged.
//! Only the code around it (reading files, writing calendars, guards) reports
//! errors through this type.

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("cannot load remote document {0}: only local files are supported")]
    RemoteUnsupported(String),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("failed to fetch {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("{url} answered HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("only {found} schedule links found (expected at least {expected}); page structure may have changed")]
    TooFewLinks { found: usize, expected: usize },

    #[error("config line {line}: {msg}")]
    Config { line: usize, msg: String },

    #[error("no schedule sources: give an overview page or at least one schedule")]
    NoSources,

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
