// src/config/consts.rs

// Calendar
pub const DEFAULT_TZID: &str = "Europe/Berlin";
pub const PRODID: &str = "-//ASW Schedule Exporter//EN";
pub const CALENDAR_NAME_PREFIX: &str = "ASW Schedule";

// Schedule page markup
pub const EVENT_CELL_CLASS: &str = "v";

// Cell extraction policy
pub const RESERVED_MARKER: &str = "Reserviert";
pub const FALLBACK_SUMMARY: &str = "ASW event";
pub const ALT_LOCATION_PREFIXES: [&str; 2] = ["NK:", "EXT:"];

// Sources
pub const SOURCE_PAGE: &str = "https://www.asw-ggmbh.de/laufender-studienbetrieb/stundenplaene";
pub const USER_AGENT: &str = concat!("sked_ics/", env!("CARGO_PKG_VERSION"));
pub const HTTP_TIMEOUT_SECS: u64 = 20;
/// Link guard applied to a remote overview page when none is configured.
pub const REMOTE_MIN_LINKS: usize = 20;

// Series aggregation
pub const FALLBACK_SERIES_KEY: &str = "Other";

// Export
pub const DEFAULT_OUT_DIR: &str = "ics_files";
pub const ICS_EXT: &str = "ics";

// Logging
pub const DEFAULT_LOG_FILE: &str = ".store/debug.log";

// Concurrency
pub const WORKERS: usize = 4;
