// src/logging.rs
//! File logger behind the `log` facade.
//!
//! Lines look like `[00:00:01.250][INFO] message`, timed from process start.
//! Appends are serialized through a mutex so worker threads never interleave.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use ::log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

static START: OnceLock<Instant> = OnceLock::new();

fn start() -> Instant {
    *START.get_or_init(Instant::now)
}

/// `HH:MM:SS.mmm` since logger start; hours keep counting past 99.
fn clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        secs / 60 % 60,
        secs % 60,
        elapsed.subsec_millis()
    )
}

pub fn format_line(elapsed: Duration, level: Level, msg: &str) -> String {
    format!("[{}][{level}] {msg}\n", clock(elapsed))
}

pub struct FileLogger {
    path: Option<PathBuf>,
    level: LevelFilter,
    echo: bool,
    lock: Mutex<()>,
}

impl FileLogger {
    /// `path = None` disables the file sink; `echo` mirrors lines to stderr.
    pub fn new(path: Option<PathBuf>, level: LevelFilter, echo: bool) -> Self {
        Self { path, level, echo, lock: Mutex::new(()) }
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_line(start().elapsed(), record.level(), &record.args().to_string());

        if let Ok(_guard) = self.lock.lock() {
            if self.echo {
                eprint!("{line}");
            }
            if let Some(path) = &self.path {
                if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                    let _ = file.write_all(line.as_bytes());
                }
            }
        }
    }

    fn flush(&self) {}
}

/// Install the process-wide logger. Call once, before any work starts.
pub fn init(path: Option<PathBuf>, level: LevelFilter, echo: bool) -> Result<(), SetLoggerError> {
    if let Some(parent) = path.as_deref().and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            // best-effort: a missing log dir must not stop the run
            let _ = fs::create_dir_all(parent);
        }
    }
    start();
    ::log::set_boxed_logger(Box::new(FileLogger::new(path, level, echo)))?;
    ::log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_zero_padded() {
        assert_eq!(clock(Duration::ZERO), "00:00:00.000");
        assert_eq!(clock(Duration::from_millis(3_723_004)), "01:02:03.004");
        assert_eq!(clock(Duration::from_secs(100 * 3600)), "100:00:00.000");
    }

    #[test]
    fn line_carries_level_and_newline() {
        let line = format_line(Duration::from_millis(1_250), Level::Warn, "no events found");
        assert_eq!(line, "[00:00:01.250][WARN] no events found\n");
    }

    #[test]
    fn logger_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("debug.log");
        let logger = FileLogger::new(Some(path.clone()), LevelFilter::Debug, false);

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .args(format_args!("hello {}", 1))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Trace)
                .args(format_args!("filtered"))
                .build(),
        );

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("[INFO] hello 1"));
        assert!(!text.contains("filtered"));
    }
}
