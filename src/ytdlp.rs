use crate::config::Config;
use crate::error::{AppError, Result};
use crate::progress::ProgressObserver;
use crate::provider::{StreamOption, StreamProvider, VideoIdentifier, VideoMetadata};
use async_trait::async_trait;
use chrono::NaiveDate;
use futures::StreamExt;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{info, instrument};

/// Concrete [`StreamProvider`] backed by the yt-dlp executable.
///
/// The manifest comes from `yt-dlp --no-progress --dump-json`; the transfer
/// itself is a plain streamed HTTP GET on the format URL the manifest
/// carries, so progress can be observed per chunk.

/// Manifest payload as emitted by `--dump-json`, reduced to the fields the
/// application reads.
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    upload_date: Option<String>,
    #[serde(default)]
    formats: Vec<RawFormat>,
}

#[derive(Debug, Deserialize)]
struct RawFormat {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    ext: Option<String>,
    // yt-dlp emits both integers and floats for sizes
    #[serde(default)]
    filesize: Option<f64>,
    #[serde(default)]
    filesize_approx: Option<f64>,
    /// Total bit rate in Kbit/s.
    #[serde(default)]
    tbr: Option<f64>,
    #[serde(default)]
    vcodec: Option<String>,
    #[serde(default)]
    acodec: Option<String>,
}

pub struct YtDlpProvider {
    config: Config,
    client: reqwest::Client,
    // One run only ever looks at one video; cache the single manifest so
    // the stream and metadata calls share a subprocess invocation.
    manifest_cache: Mutex<Option<(String, Arc<RawManifest>)>>,
}

impl YtDlpProvider {
    pub fn new(config: Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            config,
            client,
            manifest_cache: Mutex::new(None),
        })
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn manifest(&self, id: &VideoIdentifier) -> Result<Arc<RawManifest>> {
        let mut cache = self.manifest_cache.lock().await;
        if let Some((cached_id, manifest)) = cache.as_ref() {
            if cached_id == id.as_str() {
                return Ok(Arc::clone(manifest));
            }
        }

        let output = Command::new(&self.config.ytdlp_bin)
            .arg("--no-progress")
            .arg("--dump-json")
            .arg(id.watch_url())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::Provider(format!(
                "yt-dlp exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let manifest: RawManifest = serde_json::from_slice(&output.stdout)?;
        info!(formats = manifest.formats.len(), "fetched manifest");

        let manifest = Arc::new(manifest);
        *cache = Some((id.as_str().to_string(), Arc::clone(&manifest)));
        Ok(manifest)
    }
}

#[async_trait]
impl StreamProvider for YtDlpProvider {
    async fn fetch_streams(&self, id: &VideoIdentifier) -> Result<Vec<StreamOption>> {
        let manifest = self.manifest(id).await?;
        Ok(muxed_streams(&manifest))
    }

    async fn fetch_metadata(&self, id: &VideoIdentifier) -> Result<VideoMetadata> {
        let manifest = self.manifest(id).await?;
        Ok(VideoMetadata {
            title: manifest.title.clone(),
            author: manifest
                .channel
                .clone()
                .or_else(|| manifest.uploader.clone())
                .unwrap_or_else(|| String::from("unknown")),
            upload_date: parse_upload_date(manifest.upload_date.as_deref()),
        })
    }

    async fn download(
        &self,
        stream: &StreamOption,
        dest: &Path,
        progress: &dyn ProgressObserver,
    ) -> Result<()> {
        info!(dest = %dest.display(), "starting transfer");

        let response = self
            .client
            .get(&stream.url)
            .send()
            .await
            .map_err(|e| AppError::Transfer(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Transfer(format!(
                "server answered {}",
                response.status()
            )));
        }

        // Prefer the response header; the manifest size is an estimate.
        let total = response
            .content_length()
            .filter(|len| *len > 0)
            .unwrap_or(stream.size);

        let mut file = tokio::fs::File::create(dest).await?;
        let mut body = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = body.next().await {
            let chunk =
                chunk.map_err(|e| AppError::Transfer(format!("transfer interrupted: {e}")))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            if total > 0 {
                progress.report((written as f64 / total as f64).min(1.0));
            }
        }

        file.flush().await?;
        progress.report(1.0);
        info!(bytes = written, "transfer finished");
        Ok(())
    }
}

fn muxed_streams(manifest: &RawManifest) -> Vec<StreamOption> {
    manifest
        .formats
        .iter()
        .filter_map(|format| {
            let url = format.url.clone()?;
            if !has_codec(format.vcodec.as_deref()) || !has_codec(format.acodec.as_deref()) {
                return None;
            }
            Some(StreamOption {
                size: format.filesize.or(format.filesize_approx).unwrap_or(0.0) as u64,
                container: format
                    .ext
                    .clone()
                    .unwrap_or_else(|| String::from("mp4")),
                bitrate: (format.tbr.unwrap_or(0.0) * 1000.0) as u64,
                url,
            })
        })
        .collect()
}

fn has_codec(codec: Option<&str>) -> bool {
    codec.map(|c| !c.is_empty() && c != "none").unwrap_or(false)
}

fn parse_upload_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|date| NaiveDate::parse_from_str(date, "%Y%m%d").ok())
}
