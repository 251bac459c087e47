use crate::error::{AppError, Result};
use crate::progress::ProgressObserver;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;
use std::path::Path;
use url::Url;

/// Stream provider data model and capability trait.
///
/// The interactive core only ever talks to a [`StreamProvider`]; everything
/// about contacting a remote service and parsing its manifest lives behind
/// this boundary.

/// A validated video identifier.
///
/// Created by parsing free-form user input: either a bare 11-character ID
/// or one of the known URL shapes (`watch?v=`, `youtu.be/`, `shorts/`,
/// `embed/`, `live/`). Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoIdentifier(String);

impl VideoIdentifier {
    /// Parses a raw ID or URL into a validated identifier.
    ///
    /// # Errors
    /// Returns `AppError::InvalidIdentifier` with a diagnostic when the
    /// input matches neither the bare-ID grammar nor a known URL shape.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();

        if is_raw_id(raw) {
            return Ok(Self(raw.to_string()));
        }

        if let Ok(url) = Url::parse(raw) {
            if let Some(id) = id_from_url(&url) {
                return Ok(Self(id));
            }
        }

        Err(AppError::InvalidIdentifier(format!(
            "Could not parse a video ID from '{raw}'. Provide an 11-character ID or a full video URL."
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The canonical watch URL for this identifier.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl fmt::Display for VideoIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_raw_id(candidate: &str) -> bool {
    candidate.len() == 11
        && candidate
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn id_from_url(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    let id = match host {
        "youtu.be" => url.path_segments()?.next().map(str::to_string),
        "youtube.com" | "m.youtube.com" | "music.youtube.com" => {
            let mut segments = url.path_segments()?;
            match segments.next()? {
                "watch" => url
                    .query_pairs()
                    .find(|(key, _)| key == "v")
                    .map(|(_, value)| value.into_owned()),
                "shorts" | "embed" | "live" => segments.next().map(str::to_string),
                _ => None,
            }
        }
        _ => None,
    };

    id.filter(|id| is_raw_id(id))
}

/// One downloadable combined audio/video encoding of a video.
///
/// The ordinal shown in the table is display-only and never stored here;
/// the core indexes into the provider's ordered sequence instead. `url` is
/// provider-internal: it tells the transfer where the bytes live and is
/// never rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamOption {
    pub size: u64,
    pub container: String,
    /// Total bit rate in bits per second.
    pub bitrate: u64,
    pub url: String,
}

impl StreamOption {
    pub fn size_display(&self) -> String {
        const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
        let (value, unit) = scale(self.size as f64, &UNITS);
        format!("{value:.2} {unit}")
    }

    pub fn bitrate_display(&self) -> String {
        const UNITS: [&str; 4] = ["bit/s", "Kbit/s", "Mbit/s", "Gbit/s"];
        let (value, unit) = scale(self.bitrate as f64, &UNITS);
        format!("{value:.2} {unit}")
    }
}

fn scale<'a>(mut value: f64, units: &[&'a str]) -> (f64, &'a str) {
    let mut index = 0;
    while value >= 1024.0 && index < units.len() - 1 {
        value /= 1024.0;
        index += 1;
    }
    (value, units[index])
}

/// Descriptive metadata for the table header line.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub title: String,
    pub author: String,
    pub upload_date: Option<NaiveDate>,
}

impl VideoMetadata {
    /// Long-form upload date, e.g. "Monday, June 1, 2020".
    pub fn long_date(&self) -> String {
        match self.upload_date {
            Some(date) => date.format("%A, %B %-d, %Y").to_string(),
            None => String::from("an unknown date"),
        }
    }
}

/// The external collaborator the interactive core consumes.
///
/// An empty stream sequence is a valid result, not an error. Fetch and
/// download failures are fatal to the run; the core never retries them.
/// During `download` the provider invokes the observer zero or more times
/// with a monotonically non-decreasing completion fraction.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    async fn fetch_streams(&self, id: &VideoIdentifier) -> Result<Vec<StreamOption>>;

    async fn fetch_metadata(&self, id: &VideoIdentifier) -> Result<VideoMetadata>;

    async fn download(
        &self,
        stream: &StreamOption,
        dest: &Path,
        progress: &dyn ProgressObserver,
    ) -> Result<()>;
}
