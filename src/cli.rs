// src/cli.rs
//! Command-line frontend.
//!
//! ```bash
//! # whole local snapshot
//! sked_ics snapshot/stundenplaene.html -o ics_files
//!
//! # live overview page, plus a static listing site
//! sked_ics --online --site public
//!
//! # single documents, no overview page
//! sked_ics -s "DBWINFO-A04 - 3. Blockphase=snapshot/a04.html"
//!
//! # just show what would be parsed
//! sked_ics snapshot/stundenplaene.html --list
//! ```
use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use log::LevelFilter;

use crate::{
    config::{self, consts::SOURCE_PAGE, options::ScheduleSpec, RunOptions},
    core::ZoneId,
    logging,
    progress::Progress,
    runner,
    source::{HttpSource, Location},
};

/// Convert sked timetable pages into iCalendar files
#[derive(Parser, Debug)]
#[command(name = "sked_ics")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Overview page linking to all schedule documents (path or URL)
    #[arg(value_parser = parse_location)]
    pub index: Option<Location>,

    /// Fetch the live overview page instead of a snapshot
    #[arg(long, conflicts_with = "index")]
    pub online: bool,

    /// Extra schedule document, `NAME=PATH` or `NAME=URL` (repeatable)
    #[arg(short, long = "schedule", value_name = "NAME=PATH", value_parser = parse_schedule)]
    pub schedules: Vec<ScheduleSpec>,

    /// `key = value` config file; flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Also write a static listing site (index, all files, help page)
    #[arg(long, value_name = "DIR")]
    pub site: Option<PathBuf>,

    /// Time zone written to every event
    #[arg(long, value_name = "TZID")]
    pub tz: Option<String>,

    /// Parser threads
    #[arg(short = 'j', long)]
    pub workers: Option<usize>,

    /// Only write the aggregated per-series calendars
    #[arg(long)]
    pub no_per_course: bool,

    /// Do not clear the output directory first
    #[arg(long)]
    pub keep_existing: bool,

    /// Fail when the overview page yields fewer links
    #[arg(long, value_name = "N")]
    pub min_links: Option<usize>,

    /// Log file (`-` disables file logging)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,

    /// List the schedule documents and exit
    #[arg(long)]
    pub list: bool,
}

fn parse_location(s: &str) -> Result<Location, String> {
    if s.trim().is_empty() {
        return Err(s!("empty location"));
    }
    Ok(Location::parse(s))
}

fn parse_schedule(s: &str) -> Result<ScheduleSpec, String> {
    ScheduleSpec::parse(s).ok_or_else(|| format!("expected NAME=PATH, got `{s}`"))
}

impl Args {
    /// Config file (if any) first, then flags on top.
    pub fn into_options(self) -> color_eyre::Result<RunOptions> {
        let mut opts = match &self.config {
            Some(path) => config::file::load(path)
                .wrap_err_with(|| format!("loading config {}", path.display()))?,
            None => RunOptions::default(),
        };

        if self.online {
            opts.source.index = Some(Location::Remote(s!(SOURCE_PAGE)));
        } else if self.index.is_some() {
            opts.source.index = self.index;
        }
        opts.source.schedules.extend(self.schedules);
        if self.min_links.is_some() {
            opts.source.min_links = self.min_links;
        }
        if let Some(out) = self.out {
            opts.export.out_dir = out;
        }
        if self.site.is_some() {
            opts.export.site = self.site;
        }
        if self.no_per_course {
            opts.export.per_course = false;
        }
        if self.keep_existing {
            opts.export.clean = false;
        }
        if let Some(tz) = self.tz.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            opts.zone = ZoneId::new(tz);
        }
        if let Some(n) = self.workers {
            if n == 0 {
                return Err(eyre!("--workers must be at least 1"));
            }
            opts.workers = n;
        }
        if let Some(file) = self.log_file {
            opts.log.file = (file.as_os_str() != "-").then_some(file);
        }
        opts.log.level = match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Error,
            (false, 0) => opts.log.level,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        };

        Ok(opts)
    }
}

/// Prints one line per document to stdout.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
    quiet: bool,
}

impl ConsoleProgress {
    pub fn new(quiet: bool) -> Self {
        Self { quiet, ..Self::default() }
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    fn item_done(&mut self, course: &str, events: usize) {
        self.done += 1;
        if !self.quiet {
            println!("[{}/{}] {course}: {events} events", self.done, self.total);
        }
    }

    fn item_failed(&mut self, course: &str, reason: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {course}: {reason}", self.done, self.total);
    }
}

pub fn run() -> color_eyre::Result<()> {
    let args = Args::parse();
    let quiet = args.quiet;
    let list = args.list;
    let opts = args.into_options()?;

    logging::init(opts.log.file.clone(), opts.log.level, !quiet && opts.log.level >= LevelFilter::Debug)
        .wrap_err("installing logger")?;

    let source = HttpSource::new().wrap_err("setting up HTTP client")?;

    if list {
        for link in runner::gather_links(&opts.source, &source)? {
            println!("{}\t{}", link.course, link.location);
        }
        return Ok(());
    }

    let mut progress = ConsoleProgress::new(quiet);
    let summary = runner::run(&opts, &source, Some(&mut progress))?;

    if !quiet {
        println!(
            "{} documents, {} failed, {} events, {} course + {} series calendars",
            summary.documents,
            summary.failed,
            summary.events,
            summary.course_files.len(),
            summary.series_files.len(),
        );
        if let Some(site) = &opts.export.site {
            println!("{} site pages in {}", summary.site_pages.len(), site.display());
        }
    }
    if summary.failed > 0 && summary.failed == summary.documents {
        return Err(eyre!("no schedule document could be loaded"));
    }
    Ok(())
}
