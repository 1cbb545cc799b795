// src/file.rs

use std::{
    collections::HashMap,
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::debug;

use crate::config::consts::ICS_EXT;
use crate::core::{event::Event, sanitize::sanitize_stem, ZoneId};
use crate::error::{Error, Result};
use crate::ics::{write_calendar, Calendar};

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|source| Error::Write { path: dir.to_path_buf(), source })?;
    }
    Ok(())
}

/// Remove `dir` with everything in it, then recreate it empty.
pub fn reset_directory(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        fs::remove_dir_all(dir).map_err(|source| Error::Write { path: dir.to_path_buf(), source })?;
        debug!("cleared {}", dir.display());
    }
    ensure_directory(dir)
}

/// Path for a calendar named `stem`. A stem already used by this writer gets
/// a ` (2)`, ` (3)`, … suffix; files from earlier runs are not considered.
pub fn resolve_calendar_filename(
    dir: &Path,
    stem: &str,
    used: &mut HashMap<String, usize>,
    ext: &str,
) -> PathBuf {
    let uses = used.entry(stem.to_owned()).or_default();
    *uses += 1;
    let file_name = match *uses {
        1 => format!("{stem}.{ext}"),
        nth => format!("{stem} ({nth}).{ext}"),
    };
    dir.join(file_name)
}

/// Writes calendars into one directory, keeping file names unique per run.
#[derive(Debug)]
pub struct CalendarWriter {
    dir: PathBuf,
    zone: ZoneId,
    stamp: DateTime<Utc>,
    /// stem → calendars written under it so far
    used: HashMap<String, usize>,
}

impl CalendarWriter {
    /// `dir` must exist (see [`ensure_directory`] / [`reset_directory`]).
    pub fn new(dir: &Path, zone: ZoneId, stamp: DateTime<Utc>) -> Self {
        Self { dir: dir.to_path_buf(), zone, stamp, used: HashMap::new() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&mut self, name: &str, events: &[Event]) -> Result<PathBuf> {
        let stem = sanitize_stem(name);
        let path = resolve_calendar_filename(&self.dir, &stem, &mut self.used, ICS_EXT);
        let cal = Calendar { name, zone: &self.zone, events };

        let wrap = |source| Error::Write { path: path.clone(), source };
        let file = File::create(&path).map_err(wrap)?;
        let mut out = BufWriter::new(file);
        write_calendar(&mut out, &cal, self.stamp).map_err(wrap)?;
        out.flush().map_err(wrap)?;

        debug!("wrote {} events to {}", events.len(), path.display());
        Ok(path)
    }
}
