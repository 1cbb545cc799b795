// src/runner.rs
//! Whole export: overview → schedule documents → per-course and per-series calendars.
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc,
    },
    thread,
    time::Instant,
};

use chrono::Utc;
use log::{debug, info, warn};

use crate::{
    config::{
        consts::{REMOTE_MIN_LINKS, SOURCE_PAGE},
        options::{RunOptions, SourceOptions},
    },
    core::{event::Event, series::SeriesAggregator, ZoneId},
    error::{Error, Result},
    file::{ensure_directory, reset_directory, CalendarWriter},
    progress::Progress,
    site,
    source::DocumentSource,
    specs::{
        index::{dedup_links, harvest_links, ScheduleLink},
        schedule,
    },
};

/// Summary of what was produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Schedule documents attempted.
    pub documents: usize,
    /// Documents that could not be loaded.
    pub failed: usize,
    /// Events over all documents, before series deduplication.
    pub events: usize,
    pub course_files: Vec<PathBuf>,
    pub series_files: Vec<PathBuf>,
    /// HTML pages of the listing site, empty when no site was requested.
    pub site_pages: Vec<PathBuf>,
}

impl RunSummary {
    pub fn files_written(&self) -> usize {
        self.course_files.len() + self.series_files.len()
    }
}

/// Harvested overview links followed by the explicit schedules.
/// Nothing configured at all is [`Error::NoSources`]. A remote overview is
/// guarded by `REMOTE_MIN_LINKS` unless `min_links` says otherwise.
pub fn gather_links(opts: &SourceOptions, source: &dyn DocumentSource) -> Result<Vec<ScheduleLink>> {
    if opts.index.is_none() && opts.schedules.is_empty() {
        return Err(Error::NoSources);
    }

    let mut links = Vec::new();

    if let Some(index) = &opts.index {
        let html_doc = source.load(index)?;
        let harvested = harvest_links(&html_doc, index);
        info!("{index}: {} schedule links", harvested.len());

        let guard = opts.min_links.or(index.is_remote().then_some(REMOTE_MIN_LINKS));
        if let Some(expected) = guard {
            if harvested.len() < expected {
                return Err(Error::TooFewLinks { found: harvested.len(), expected });
            }
        }
        links.extend(harvested);
    }

    links.extend(opts.schedules.iter().map(|s| ScheduleLink {
        course: s.course.clone(),
        location: s.location.clone(),
    }));

    Ok(dedup_links(links))
}

/* ---------------- Parsing (worker pool) ---------------- */

type Parsed = Result<Vec<Event>>;

/// Load and parse every link on up to `workers` threads. The result is in link order.
pub fn collect_documents(
    links: &[ScheduleLink],
    source: &dyn DocumentSource,
    zone: &ZoneId,
    workers: usize,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Vec<Parsed> {
    let counter = AtomicUsize::new(0);
    let (res_tx, res_rx) = mpsc::channel::<(usize, Parsed)>();
    let workers = workers.min(links.len()).max(1);

    let mut slots: Vec<Option<Parsed>> = (0..links.len()).map(|_| None).collect();

    thread::scope(|scope| {
        for _ in 0..workers {
            let tx = res_tx.clone();
            let counter = &counter;
            scope.spawn(move || loop {
                let i = counter.fetch_add(1, Ordering::Relaxed);
                let Some(link) = links.get(i) else { break };
                let result = source
                    .load(&link.location)
                    .map(|html_doc| schedule::parse_doc(&html_doc, &link.course, zone));
                if tx.send((i, result)).is_err() {
                    break;
                }
            });
        }
        drop(res_tx); // main thread is sole receiver now

        for (i, result) in res_rx {
            let course = &links[i].course;
            match &result {
                Ok(events) => {
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_done(course, events.len());
                    }
                }
                Err(e) => {
                    warn!("{course}: {e}");
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(course, &e.to_string());
                    }
                }
            }
            slots[i] = Some(result);
        }
    });

    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(|| Ok(Vec::new())))
        .collect()
}

/* ---------------- Top level ---------------- */

/// `progress` can be None (no UI updates) or Some(&mut impl Progress).
pub fn run(
    opts: &RunOptions,
    source: &dyn DocumentSource,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<RunSummary> {
    let result = export(opts, source, progress.as_deref_mut());
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    result
}

fn export(
    opts: &RunOptions,
    source: &dyn DocumentSource,
    mut progress: Option<&mut (dyn Progress + '_)>,
) -> Result<RunSummary> {
    let t = Instant::now();
    let links = gather_links(&opts.source, source)?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(links.len());
        p.log(&format!("Parsing {} schedule documents…", links.len()));
    }
    let parsed = collect_documents(&links, source, &opts.zone, opts.workers, progress.as_deref_mut());

    let out_dir = &opts.export.out_dir;
    if opts.export.clean {
        reset_directory(out_dir)?;
    } else {
        ensure_directory(out_dir)?;
    }
    let mut writer = CalendarWriter::new(out_dir, opts.zone.clone(), Utc::now());

    let mut summary = RunSummary { documents: links.len(), ..RunSummary::default() };
    let mut series = SeriesAggregator::new();

    for (link, result) in links.iter().zip(parsed) {
        let events = match result {
            Ok(events) => events,
            Err(_) => {
                summary.failed += 1;
                continue;
            }
        };
        if events.is_empty() {
            info!("{}: no events, skipped", link.course);
            continue;
        }

        summary.events += events.len();
        if opts.export.per_course {
            summary.course_files.push(writer.write(&link.course, &events)?);
        }
        let key = series.add(&link.course, events);
        debug!("{} → series {key}", link.course);
    }

    for s in series.into_series() {
        info!("series {}: {} events", s.key, s.events.len());
        summary.series_files.push(writer.write(&s.key, &s.events)?);
    }

    if let Some(site_dir) = &opts.export.site {
        summary.site_pages = site::generate_site(out_dir, site_dir, SOURCE_PAGE)?;
        info!("site: {} pages in {}", summary.site_pages.len(), site_dir.display());
    }

    info!(
        "{} documents ({} failed), {} events, {} calendars in {} ({:?})",
        summary.documents,
        summary.failed,
        summary.events,
        summary.files_written(),
        out_dir.display(),
        t.elapsed(),
    );
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Wrote {} calendars to {}", summary.files_written(), out_dir.display()));
    }
    Ok(summary)
}
