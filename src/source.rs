// src/source.rs
//! Where documents come from.
//!
//! Overview links resolve to a [`Location`]; a [`DocumentSource`] turns a
//! location into decoded HTML text. [`FsSource`] reads local snapshots only,
//! [`HttpSource`] additionally fetches `http(s)://` pages.
use std::{
    borrow::Cow,
    fmt, fs,
    path::{Path, PathBuf},
    sync::LazyLock,
    time::Duration,
};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use log::{debug, trace};
use regex::bytes::Regex;
use reqwest::{
    blocking::{Client, ClientBuilder},
    header::CONTENT_TYPE,
    StatusCode, Url,
};

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};
use crate::error::{Error, Result};

/// `<meta charset="...">`, `content="text/html; charset=..."` and the
/// `Content-Type` response header.
static CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)charset\s*=\s*["']?([A-Za-z0-9_\-:.]+)"#).expect("valid charset regex")
});

/// Only the head of a document is searched for a charset declaration.
const CHARSET_SNIFF_BYTES: usize = 2048;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    File(PathBuf),
    Remote(String),
}

impl Location {
    /// `http(s)://…` → remote, `file://…` → path, anything else is a plain path.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Remote(s!(s))
        } else if lower.starts_with("file://") {
            Self::File(PathBuf::from(&s["file://".len()..]))
        } else {
            Self::File(PathBuf::from(s))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(p) => write!(f, "{}", p.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

/// Resolve an overview-page `href` against the page it was found on.
///
/// Absolute `http(s)://` and `file://` targets stand alone. On a remote page the
/// href is joined as a URL; on a local page it is joined onto the page's
/// directory with a leading `/` removed (snapshot folders are flat mirrors).
pub fn resolve_href(href: &str, page: &Location) -> Location {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();
    if ["http://", "https://", "file://"].iter().any(|p| lower.starts_with(p)) {
        return Location::parse(href);
    }

    match page {
        Location::Remote(page_url) => match Url::parse(page_url).and_then(|base| base.join(href)) {
            Ok(url) => Location::Remote(url.into()),
            Err(e) => {
                debug!("cannot join {href} onto {page_url}: {e}");
                Location::Remote(s!(href))
            }
        },
        Location::File(page_path) => {
            let base_dir = page_path.parent().unwrap_or(Path::new("."));
            Location::File(base_dir.join(href.trim_start_matches('/')))
        }
    }
}

pub trait DocumentSource: Sync {
    fn load(&self, location: &Location) -> Result<String>;
}

/// Local files only.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsSource;

impl DocumentSource for FsSource {
    fn load(&self, location: &Location) -> Result<String> {
        match location {
            Location::File(path) => {
                let bytes = fs::read(path).map_err(|source| Error::Read { path: path.clone(), source })?;
                trace!("read {} bytes from {}", bytes.len(), path.display());
                Ok(decode_html(&bytes).into_owned())
            }
            Location::Remote(url) => Err(Error::RemoteUnsupported(url.clone())),
        }
    }
}

/// Remote pages over HTTP(S), local files like [`FsSource`].
///
/// Anything but `200 OK` is an error, so an error page is never parsed as an
/// (empty) schedule.
#[derive(Clone, Debug)]
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    /// Client settings used by [`HttpSource::new`]: timeout and user agent.
    pub fn client_builder() -> ClientBuilder {
        Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
    }

    pub fn new() -> Result<Self> {
        let client = Self::client_builder().build().map_err(Error::HttpClient)?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn fetch(&self, url: &str) -> Result<String> {
        let fetch_err = |source| Error::Fetch { url: s!(url), source };

        let resp = self.client.get(url).send().map_err(fetch_err)?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(Error::HttpStatus { url: s!(url), status: status.as_u16() });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = resp.bytes().map_err(fetch_err)?;
        trace!("fetched {} bytes from {url}", bytes.len());
        Ok(decode_document(&bytes, content_type.as_deref()).into_owned())
    }
}

impl DocumentSource for HttpSource {
    fn load(&self, location: &Location) -> Result<String> {
        match location {
            Location::File(_) => FsSource.load(location),
            Location::Remote(url) => self.fetch(url),
        }
    }
}

/// Charset from the transport (`Content-Type`) wins; without one the bytes
/// are decoded like a file ([`decode_html`]).
pub fn decode_document<'a>(bytes: &'a [u8], content_type: Option<&str>) -> Cow<'a, str> {
    let declared = content_type
        .and_then(|ct| CHARSET_RE.captures(ct.as_bytes()))
        .and_then(|caps| Encoding::for_label(&caps[1]));

    match declared {
        Some(encoding) => {
            // BOM, when present, still overrides the header
            let (text, used, _) = encoding.decode(bytes);
            debug!("decoded response as {}", used.name());
            text
        }
        None => decode_html(bytes),
    }
}

/// UTF-8 (BOM stripped) as-is; otherwise the declared charset, falling back to
/// windows-1252 which every byte sequence decodes under.
pub fn decode_html(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Cow::Borrowed(text);
    }

    let encoding = declared_encoding(bytes)
        .filter(|enc| *enc != UTF_8)
        .unwrap_or(WINDOWS_1252);
    let (text, _, had_errors) = encoding.decode(bytes);
    debug!("decoded document as {}{}", encoding.name(), if had_errors { " (with replacements)" } else { "" });
    text
}

fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(CHARSET_SNIFF_BYTES)];
    let caps = CHARSET_RE.captures(head)?;
    Encoding::for_label(&caps[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::{Read, Write},
        net::TcpListener,
        sync::mpsc,
        thread,
    };

    /// Answer one request on a loopback port with `response`; the raw request
    /// comes back through the channel.
    fn serve_once(response: Vec<u8>) -> (String, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 8192];
                let n = stream.read(&mut buf).unwrap_or(0);
                let _ = tx.send(String::from_utf8_lossy(&buf[..n]).into_owned());
                let _ = stream.write_all(&response);
                let _ = stream.flush();
            }
        });
        (format!("http://{addr}/plaene/a04.html"), rx)
    }

    fn response(status: &str, content_type: &str, body: &[u8]) -> Vec<u8> {
        let mut out = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        )
        .into_bytes();
        out.extend_from_slice(body);
        out
    }

    fn local_client() -> HttpSource {
        HttpSource::with_client(HttpSource::client_builder().no_proxy().build().unwrap())
    }

    #[test]
    fn location_parsing() {
        assert_eq!(Location::parse(" https://x.org/a "), Location::Remote(s!("https://x.org/a")));
        assert_eq!(Location::parse("file:///tmp/p.html"), Location::File(PathBuf::from("/tmp/p.html")));
        assert_eq!(Location::parse("snap/index.html"), Location::File(PathBuf::from("snap/index.html")));
        assert!(Location::parse("HTTP://x").is_remote());
    }

    #[test]
    fn href_resolution_on_local_page() {
        let page = Location::File(PathBuf::from("/snap/asw/index.html"));
        let base = Path::new("/snap/asw");
        assert_eq!(
            resolve_href("https://example.org/a.html", &page),
            Location::Remote(s!("https://example.org/a.html"))
        );
        assert_eq!(resolve_href("HTTP://x/y.htm", &page), Location::Remote(s!("HTTP://x/y.htm")));
        assert_eq!(resolve_href("file:///tmp/p.html", &page), Location::File(PathBuf::from("/tmp/p.html")));
        assert_eq!(resolve_href("/plaene/p.html", &page), Location::File(base.join("plaene/p.html")));
        assert_eq!(resolve_href(" p.html ", &page), Location::File(base.join("p.html")));
    }

    #[test]
    fn href_resolution_on_remote_page() {
        let page = Location::Remote(s!("https://www.asw-ggmbh.de/laufender-studienbetrieb/stundenplaene"));
        assert_eq!(
            resolve_href("/fileadmin/plan_block.html", &page),
            Location::Remote(s!("https://www.asw-ggmbh.de/fileadmin/plan_block.html"))
        );
        assert_eq!(
            resolve_href("plaene/a04.html", &page),
            Location::Remote(s!("https://www.asw-ggmbh.de/laufender-studienbetrieb/plaene/a04.html"))
        );
    }

    #[test]
    fn utf8_passes_through() {
        assert_eq!(decode_html("Übung".as_bytes()), "Übung");
        assert_eq!(decode_html(b"\xEF\xBB\xBFRaum"), "Raum");
    }

    #[test]
    fn latin1_is_decoded() {
        let declared = b"<meta charset=\"iso-8859-1\"><p>\xDCbung</p>";
        assert_eq!(decode_html(declared), "<meta charset=\"iso-8859-1\"><p>Übung</p>");

        // no declaration → windows-1252
        assert_eq!(decode_html(b"Gr\xFC\xDFe \x80"), "Grüße €");
    }

    #[test]
    fn header_charset_wins() {
        assert_eq!(decode_document(b"\xDCbung", Some("text/html; charset=ISO-8859-1")), "Übung");
        assert_eq!(decode_document("Übung".as_bytes(), Some("text/html")), "Übung");
        assert_eq!(decode_document(b"\xDCbung", None), "Übung");
    }

    #[test]
    fn fs_source_reads_and_rejects_remote() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.html");
        fs::write(&path, "<p>ok</p>").unwrap();

        let src = FsSource;
        assert_eq!(src.load(&Location::File(path)).unwrap(), "<p>ok</p>");
        assert!(matches!(
            src.load(&Location::Remote(s!("https://x"))),
            Err(Error::RemoteUnsupported(_))
        ));
        assert!(matches!(
            src.load(&Location::File(dir.path().join("missing.html"))),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn http_source_fetches_and_decodes() {
        let (url, request) = serve_once(response(
            "200 OK",
            "text/html; charset=iso-8859-1",
            b"<p>\xDCbung</p>",
        ));

        let text = local_client().load(&Location::Remote(url)).unwrap();
        assert_eq!(text, "<p>Übung</p>");

        let request = request.recv().unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /plaene/a04.html"));
        assert!(request.contains("user-agent: sked_ics/"));
    }

    #[test]
    fn http_source_rejects_non_200() {
        let (url, _request) = serve_once(response("404 Not Found", "text/html", b"<p>weg</p>"));
        let err = local_client().load(&Location::Remote(url)).unwrap_err();
        assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
    }

    #[test]
    fn http_source_reads_local_files_too() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.html");
        fs::write(&path, "<p>lokal</p>").unwrap();
        assert_eq!(local_client().load(&Location::File(path)).unwrap(), "<p>lokal</p>");
    }
}
