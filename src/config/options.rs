// src/config/options.rs
use std::path::PathBuf;

use log::LevelFilter;

use super::consts::*;
use crate::core::event::ZoneId;
use crate::source::Location;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunOptions {
    pub source: SourceOptions,
    pub export: ExportOptions,
    pub log: LogOptions,
    pub zone: ZoneId,
    pub workers: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            source: SourceOptions::default(),
            export: ExportOptions::default(),
            log: LogOptions::default(),
            zone: ZoneId::default(),
            workers: WORKERS,
        }
    }
}

/// Where schedule documents come from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceOptions {
    /// Overview page listing all schedule documents: a local snapshot or an
    /// `http(s)://` URL.
    pub index: Option<Location>,
    /// Schedule documents given directly, processed after the harvested ones.
    pub schedules: Vec<ScheduleSpec>,
    /// Fail if the overview page yields fewer links than this. Unset on a
    /// remote overview means `REMOTE_MIN_LINKS`.
    pub min_links: Option<usize>,
}

/// One explicitly named schedule document, written `NAME=PATH` (or `NAME=URL`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleSpec {
    pub course: String,
    pub location: Location,
}

impl ScheduleSpec {
    pub fn parse(text: &str) -> Option<Self> {
        let (course, path) = text.split_once('=')?;
        let (course, path) = (course.trim(), path.trim());
        if course.is_empty() || path.is_empty() {
            return None;
        }
        Some(Self { course: s!(course), location: Location::parse(path) })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub out_dir: PathBuf,
    /// Also render a static listing site (pages + copied calendars) here.
    pub site: Option<PathBuf>,
    /// Write one calendar per schedule document next to the per-series ones.
    pub per_course: bool,
    /// Wipe `out_dir` before writing.
    pub clean: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            site: None,
            per_course: true,
            clean: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogOptions {
    pub file: Option<PathBuf>,
    pub level: LevelFilter,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            level: LevelFilter::Info,
        }
    }
}
