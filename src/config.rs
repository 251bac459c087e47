use serde::Deserialize;
use std::path::PathBuf;

/// Configuration management for the application.
///
/// Centralizes the tunables of the interactive flow:
/// - Table rendering width
/// - Location of the yt-dlp executable
/// - HTTP user agent for the transfer

/// Configuration for the video downloader application.
///
/// There is no configuration file; `Default` carries the in-code values
/// used by a normal run.
///
/// # Examples
///
/// ```
/// use tubefetch::Config;
///
/// let config = Config::default();
/// assert!(config.table_width > 0);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Total table width in characters, borders included.
    pub table_width: usize,
    /// Path to the yt-dlp executable used for manifest fetching.
    pub ytdlp_bin: PathBuf,
    /// User agent sent with download requests.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_width: 70,
            ytdlp_bin: PathBuf::from("yt-dlp"),
            user_agent: String::from(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
            ),
        }
    }
}
