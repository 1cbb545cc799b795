// src/config/file.rs
//! Optional `key = value` run configuration.
//!
//! ```text
//! # overview page: local snapshot or https:// URL
//! index = snapshot/stundenplaene.html
//! out_dir = ics_files
//! site_dir = public
//! timezone = Europe/Berlin
//! workers = 4
//! per_course = 1
//! clean = true
//! min_links = 20
//! log_file = .store/debug.log
//! log_level = debug
//! schedule = DBWINFO-A04 - 3. Blockphase = snapshot/a04.html
//! ```
//!
//! Unknown keys are ignored; a known key with a bad value is an error.
use std::{fs, path::{Path, PathBuf}, str::FromStr};

use log::LevelFilter;

use super::options::{RunOptions, ScheduleSpec};
use crate::core::event::ZoneId;
use crate::error::{Error, Result};
use crate::source::Location;

/// Read `path` and apply it on top of `RunOptions::default()`.
pub fn load(path: &Path) -> Result<RunOptions> {
    let text = fs::read_to_string(path)
        .map_err(|source| Error::Read { path: path.to_path_buf(), source })?;
    let mut opts = RunOptions::default();
    apply(&text, &mut opts)?;
    Ok(opts)
}

pub fn apply(text: &str, opts: &mut RunOptions) -> Result<()> {
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') { continue; }

        let lineno = idx + 1;
        let Some((key, val)) = line.split_once('=') else {
            return Err(bad(lineno, "expected `key = value`"));
        };
        let (key, val) = (key.trim(), val.trim());

        match key {
            "index" => opts.source.index = (!val.is_empty()).then(|| Location::parse(val)),
            "min_links" => opts.source.min_links = Some(parse_num(val, lineno)?),
            "schedule" => {
                let spec = ScheduleSpec::parse(val)
                    .ok_or_else(|| bad(lineno, "schedule must be `NAME = PATH`"))?;
                opts.source.schedules.push(spec);
            }
            "out_dir" => {
                opts.export.out_dir = non_empty_path(val)
                    .ok_or_else(|| bad(lineno, "out_dir must not be empty"))?;
            }
            "site_dir" => opts.export.site = non_empty_path(val),
            "per_course" => opts.export.per_course = parse_bool(val),
            "clean" => opts.export.clean = parse_bool(val),
            "timezone" => {
                if val.is_empty() {
                    return Err(bad(lineno, "timezone must not be empty"));
                }
                opts.zone = ZoneId::new(val);
            }
            "workers" => opts.workers = parse_num::<usize>(val, lineno)?.max(1),
            "log_file" => opts.log.file = non_empty_path(val),
            "log_level" => {
                opts.log.level = LevelFilter::from_str(val)
                    .map_err(|_| bad(lineno, "unknown log level"))?;
            }
            _ => log::debug!("config: ignoring unknown key `{key}` on line {lineno}"),
        }
    }
    Ok(())
}

fn parse_bool(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}

fn parse_num<T: FromStr>(val: &str, line: usize) -> Result<T> {
    val.parse().map_err(|_| bad(line, "expected a non-negative number"))
}

fn non_empty_path(val: &str) -> Option<PathBuf> {
    if val.is_empty() { None } else { Some(PathBuf::from(val)) }
}

fn bad(line: usize, msg: &str) -> Error {
    Error::Config { line, msg: s!(msg) }
}
