// src/site.rs
//! Static listing site over the written calendars.
//!
//! ```text
//! <site>/index.html        aggregated class/series calendars
//! <site>/all.html          every calendar, per-course files included
//! <site>/help-google.html  subscription help for Google Calendar
//! <site>/ics_files/*.ics   copies of the calendars the pages link to
//! ```
//!
//! Files are grouped by program block (`DBWINFO`) and then by class (`A04`,
//! `01`); files without a class land in a trailing "General" group.
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use log::{debug, info};
use regex::Regex;

use crate::config::consts::ICS_EXT;
use crate::error::{Error, Result};
use crate::file::{ensure_directory, reset_directory};

pub const ICS_SUBDIR: &str = "ics_files";
pub const INDEX_PAGE: &str = "index.html";
pub const ALL_PAGE: &str = "all.html";
pub const HELP_PAGE: &str = "help-google.html";

/// Block used for files that do not start with a `DB…` program prefix.
pub const OTHER_BLOCK: &str = "Other";

/// `DBWINFO-A04.ics`, `DBING-01.ics`
static AGG_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^DB[A-Z]+-(?:[A-Z][0-9]{2,3}|[0-9]{2})\.ics$").expect("valid class calendar regex")
});

/// `DBING.ics`
static AGG_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^DB[A-Z]+\.ics$").expect("valid block calendar regex"));

static CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(DB[A-Z]+)(?:-([A-Z][0-9]{2,3}|[0-9]{2}))?").expect("valid block/class regex")
});

static DASH_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-{2,}").expect("valid dash run regex"));

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Subgroup {
    Class(String),
    /// Files of a block without a class token; always listed last.
    General,
}

/// block → subgroup → sorted file names
pub type Blocks = BTreeMap<String, BTreeMap<Subgroup, Vec<String>>>;

/// Copy the calendars from `ics_dir` into the site and render its pages.
/// Returns the written HTML pages.
pub fn generate_site(ics_dir: &Path, site_dir: &Path, source_page: &str) -> Result<Vec<PathBuf>> {
    ensure_directory(site_dir)?;
    let names = calendar_names(ics_dir)?;

    let published = site_dir.join(ICS_SUBDIR);
    if same_directory(ics_dir, &published) {
        debug!("calendars already live in {}", published.display());
    } else {
        reset_directory(&published)?;
        for name in &names {
            let dst = published.join(name);
            fs::copy(ics_dir.join(name), &dst).map_err(|source| Error::Write { path: dst, source })?;
        }
    }

    let (aggregated, _) = split_aggregated(&names);
    let pages = [
        (INDEX_PAGE, render_listing(Listing::Classes, &group_files(&aggregated), source_page)),
        (ALL_PAGE, render_listing(Listing::All, &group_files(&names), source_page)),
        (HELP_PAGE, render_help_page(source_page)),
    ];

    let mut written = Vec::with_capacity(pages.len());
    for (file_name, html) in pages {
        let path = site_dir.join(file_name);
        fs::write(&path, html).map_err(|source| Error::Write { path: path.clone(), source })?;
        written.push(path);
    }

    info!(
        "site: {} calendars ({} aggregated) in {}",
        names.len(),
        aggregated.len(),
        site_dir.display()
    );
    Ok(written)
}

/// Sorted `.ics` file names directly inside `dir`.
fn calendar_names(dir: &Path) -> Result<Vec<String>> {
    let read_err = |source| Error::Read { path: dir.to_path_buf(), source };
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if !path.is_file() || path.extension().is_none_or(|e| e != ICS_EXT) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(s!(name));
        }
    }
    names.sort();
    Ok(names)
}

fn same_directory(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// (aggregated class/block calendars, everything else), order kept.
pub fn split_aggregated(names: &[String]) -> (Vec<String>, Vec<String>) {
    names
        .iter()
        .cloned()
        .partition(|n| AGG_CLASS_RE.is_match(n) || AGG_BLOCK_RE.is_match(n))
}

pub fn group_files(names: &[String]) -> Blocks {
    let mut blocks = Blocks::new();
    for name in names {
        let (block, sub) = classify(name);
        blocks.entry(block).or_default().entry(sub).or_default().push(name.clone());
    }
    for files in blocks.values_mut().flat_map(BTreeMap::values_mut) {
        files.sort();
    }
    blocks
}

fn classify(name: &str) -> (String, Subgroup) {
    let norm = normalize_name(name);
    match CLASS_RE.captures(&norm) {
        Some(caps) => {
            let sub = caps.get(2).map_or(Subgroup::General, |c| Subgroup::Class(s!(c.as_str())));
            (s!(&caps[1]), sub)
        }
        None => (s!(OTHER_BLOCK), Subgroup::General),
    }
}

/// `DBWINFO-A04_-_3_Blockphase (2).ics` → `DBWINFO-A04-3-Blockphase-(2)`
fn normalize_name(name: &str) -> String {
    let stem = name.strip_suffix(".ics").unwrap_or(name);
    let dashed = stem.replace(['_', ' '], "-");
    DASH_RUN_RE.replace_all(&dashed, "-").into_owned()
}

/// File name without extension, underscores as spaces.
fn label(name: &str) -> String {
    name.strip_suffix(".ics").unwrap_or(name).replace('_', " ")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/* ---------------- Pages ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Listing {
    Classes,
    All,
}

impl Listing {
    fn title(self) -> &'static str {
        match self {
            Self::Classes => "ASW Class Calendars",
            Self::All => "ASW All Calendars",
        }
    }

    fn subtitle(self) -> &'static str {
        match self {
            Self::Classes => "Aggregated calendars per class/block. Recommended for subscription.",
            Self::All => "All generated calendars including individual block files.",
        }
    }

    fn nav(self) -> (&'static str, &'static str) {
        match self {
            Self::Classes => (ALL_PAGE, "Show individual calendars"),
            Self::All => (INDEX_PAGE, "Back to class calendars"),
        }
    }
}

fn page_head(title: &str, subtitle: &str) -> String {
    let (title, subtitle) = (escape_html(title), escape_html(subtitle));
    format!(
        "<!doctype html><html lang='en'><head><meta charset='utf-8'>\
         <meta name='viewport' content='width=device-width, initial-scale=1'>\
         <title>{title}</title><style>{SITE_CSS}</style></head><body>\
         <header><h1>{title}</h1><p>{subtitle}</p></header>"
    )
}

fn nav_line(links: &[(&str, &str, bool)]) -> String {
    let mut html = s!("<nav class='navline'>");
    for (href, text, primary) in links {
        let class = if *primary { "navlink" } else { "navlink secondary" };
        html.push_str(&format!("<a class='{class}' href='{}'>{}</a>", escape_html(href), escape_html(text)));
    }
    html.push_str("</nav>");
    html
}

fn page_tail(script: bool) -> String {
    let script = if script { SITE_JS } else { "" };
    format!("<footer>Generated by sked_ics.</footer>{script}</body></html>")
}

fn file_count(groups: &BTreeMap<Subgroup, Vec<String>>) -> usize {
    groups.values().map(Vec::len).sum()
}

fn render_listing(listing: Listing, blocks: &Blocks, source_page: &str) -> String {
    let (nav_href, nav_text) = listing.nav();
    let mut html = page_head(listing.title(), listing.subtitle());
    html.push_str(&nav_line(&[(nav_href, nav_text, true), (source_page, "Source page", false)]));

    if !blocks.is_empty() {
        html.push_str("<div class='toolbar'>");
        for (block, groups) in blocks {
            let block = escape_html(block);
            html.push_str(&format!(
                "<a class='toolbtn' href='#{block}'><span>{block}</span><span class='count'>{}</span></a>",
                file_count(groups)
            ));
        }
        html.push_str("</div>");
    }

    html.push_str(
        "<aside class='infobox'><div class='infobox-title'>Quick setup</div><div class='infobox-body'>\
         <b>Subscribe</b> opens a webcal subscription (works best on Apple devices). \
         For Google Calendar on Android or Windows <a href='help-google.html'>see this guide</a>. \
         <b>Copy URL</b> gives the feed address for manual setup, <b>Open file</b> downloads it for a one-time import.\
         </div></aside>",
    );

    html.push_str("<main>");
    if blocks.is_empty() {
        html.push_str("<section class='group'><h2>No files</h2><p class='small'>No calendars have been generated yet.</p></section>");
    }
    for (block, groups) in blocks {
        let block = escape_html(block);
        html.push_str(&format!(
            "<section class='group' id='{block}'><h2>{block} <span class='badge'>{} files</span></h2>",
            file_count(groups)
        ));
        for (sub, files) in groups {
            let heading = match sub {
                Subgroup::Class(class) => format!("Class {}", escape_html(class)),
                Subgroup::General => s!("General"),
            };
            html.push_str(&format!(
                "<div class='subgroup'><div class='subhead'>{heading} <span class='subbadge'>{}</span></div><ul>",
                files.len()
            ));
            for name in files {
                html.push_str(&file_row(name));
            }
            html.push_str("</ul></div>");
        }
        html.push_str("</section>");
    }
    html.push_str("</main>");
    html.push_str(&page_tail(true));
    html
}

fn file_row(name: &str) -> String {
    let file = escape_html(name);
    let label = escape_html(&label(name));
    format!(
        "<li class='row'><div class='row-left'><div class='file'>{label}</div><div class='small'>{file}</div></div>\
         <div class='actions'>\
         <button class='btn btn-primary' data-file='{file}' onclick='subscribe(this.dataset.file)'>Subscribe</button>\
         <button class='btn' data-file='{file}' onclick='copyUrl(this.dataset.file, this)'>Copy URL</button>\
         <a class='btn' href='{ICS_SUBDIR}/{file}'>Open file</a>\
         </div></li>"
    )
}

fn render_help_page(source_page: &str) -> String {
    let step = |what: &str, hint: &str| {
        format!("<li class='row'><div class='row-left'><div class='file'>{what}</div><div class='small'>{hint}</div></div></li>")
    };

    let mut html = page_head(
        "Google Calendar setup",
        "How to add these ASW calendars on Android and in Google Calendar.",
    );
    html.push_str(&nav_line(&[
        (INDEX_PAGE, "Back to class calendars", true),
        (ALL_PAGE, "All calendars", false),
        (source_page, "Source page", false),
    ]));
    html.push_str("<main>");

    html.push_str("<section class='group'><h2>Subscribe by URL (recommended)</h2><p class='small'>The calendar keeps itself up to date.</p><div class='subgroup'><ul>");
    html.push_str(&step(
        "Open <a href='https://calendar.google.com' target='_blank' rel='noopener noreferrer'>Google Calendar</a> in a browser",
        "The Android app does not offer adding calendars by URL.",
    ));
    html.push_str(&step("Choose \u{201c}Other calendars\u{201d} \u{2192} \u{201c}From URL\u{201d}", "Found in the left sidebar."));
    html.push_str(&step("Paste the address from \u{201c}Copy URL\u{201d}", "Use the button next to your class calendar."));
    html.push_str(&step("Confirm with \u{201c}Add calendar\u{201d}", "Updates arrive automatically from then on."));
    html.push_str("</ul></div></section>");

    html.push_str("<section class='group'><h2>Import the file</h2><p class='small'>A one-time copy that does not update.</p><div class='subgroup'><ul>");
    html.push_str(&step("Tap \u{201c}Open file\u{201d}", "The .ics file is downloaded to your device."));
    html.push_str(&step("Open it with your calendar app", "Most apps show an import dialog."));
    html.push_str("</ul></div></section>");

    html.push_str(
        "<section class='group'><h2>Note</h2><p class='small'>\u{201c}Subscribe\u{201d} uses webcal links, \
         which Apple devices handle best. On Android the HTTPS address or a file import is the safer route.</p></section>",
    );
    html.push_str("</main>");
    html.push_str(&page_tail(false));
    html
}

const SITE_CSS: &str = "\
:root{--bg:#10131a;--card:#171b24;--text:#e4e6eb;--muted:#9aa3b5;--accent:#80a6ff;--border:#272e3d;--soft:rgba(128,166,255,.13);--ok:rgba(110,230,160,.15)}\
*{box-sizing:border-box}\
body{margin:0;font-family:system-ui,-apple-system,'Segoe UI',Roboto,sans-serif;background:var(--bg);color:var(--text)}\
header{padding:36px 20px 6px;text-align:center}\
header h1{margin:0 0 6px;font-size:27px}\
header p{margin:0;color:var(--muted)}\
.navline,.toolbar,.infobox,main,footer{max-width:1000px;margin:10px auto 0;padding:0 20px}\
.navline,.toolbar{display:flex;gap:8px;flex-wrap:wrap;justify-content:center}\
.navlink,.toolbtn{display:inline-flex;gap:8px;align-items:center;padding:7px 12px;border-radius:10px;background:var(--soft);border:1px solid var(--border);color:var(--text);text-decoration:none;font-size:12px;font-weight:600}\
.navlink.secondary{background:transparent;color:var(--muted)}\
.count,.subbadge{font-size:10px;padding:1px 6px;border-radius:999px;border:1px solid var(--border);color:var(--muted)}\
.infobox{font-size:12px;color:var(--muted)}\
.infobox-title{font-weight:700;color:var(--text);margin-bottom:4px}\
.infobox a{color:var(--accent)}\
main{display:grid;gap:16px;padding-top:8px}\
.group{background:var(--card);border:1px solid var(--border);border-radius:14px;padding:16px 16px 8px}\
.group h2{margin:0 0 10px;font-size:18px;display:flex;gap:8px;align-items:center}\
.badge{font-size:11px;padding:2px 8px;border-radius:999px;background:var(--soft);color:var(--accent)}\
.subgroup+.subgroup{border-top:1px solid var(--border);margin-top:10px;padding-top:10px}\
.subhead{display:flex;gap:8px;align-items:center;margin-bottom:6px;font-size:14px;color:var(--muted)}\
ul{list-style:none;margin:0;padding:0}\
.row{display:flex;gap:10px;align-items:center;justify-content:space-between;padding:9px 4px;border-top:1px dashed var(--border)}\
.row:first-child{border-top:none}\
.row-left{min-width:0;display:flex;flex-direction:column;gap:2px}\
.file{font-weight:600;overflow:hidden;text-overflow:ellipsis;white-space:nowrap}\
.file a{color:var(--accent)}\
.small{color:var(--muted);font-size:11px;margin:0}\
.actions{display:flex;gap:6px;flex-wrap:wrap}\
.btn{border:1px solid var(--border);background:transparent;color:var(--text);padding:6px 9px;font-size:11px;border-radius:8px;cursor:pointer;text-decoration:none;font-weight:600}\
.btn-primary{background:var(--soft)}\
.btn-ok{background:var(--ok)}\
footer{margin:12px auto 40px;color:var(--muted);font-size:12px;text-align:center}";

const SITE_JS: &str = "<script>\
function fileUrl(name){return new URL('ics_files/'+encodeURIComponent(name),window.location.href).href}\
function webcalUrl(url){return url.replace(/^https?:\\/\\//i,'webcal://')}\
function subscribe(name){window.location.href=webcalUrl(fileUrl(name))}\
async function copyUrl(name,btn){\
const url=fileUrl(name);\
try{await navigator.clipboard.writeText(url);const old=btn.textContent;btn.textContent='Copied';btn.classList.add('btn-ok');\
setTimeout(()=>{btn.textContent=old;btn.classList.remove('btn-ok')},900)}\
catch(e){window.prompt('Copy this URL:',url)}}\
</script>";
