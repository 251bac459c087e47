use crate::config::Config;
use crate::error::{AppError, Result};
use crate::progress::ProgressIndicator;
use crate::provider::{StreamOption, StreamProvider, VideoIdentifier, VideoMetadata};
use crate::table::{TableRenderer, STREAM_TABLE_HEADER};
use crate::validate;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::info;

/// The interactive prompt/validate/download flow.
///
/// Runs a strict sequence of retry-until-valid stages: identifier,
/// stream selection, save directory, then the download itself. No stage is
/// re-entered once passed; recoverable validation errors print one line and
/// re-prompt, provider and transfer failures propagate to the caller.
///
/// Generic over the input source so the whole flow runs against scripted
/// input in tests.
pub struct InteractionLoop<P, R> {
    provider: P,
    input: R,
    table: TableRenderer,
}

impl<P: StreamProvider, R: BufRead> InteractionLoop<P, R> {
    pub fn new(provider: P, config: &Config, input: R) -> Self {
        Self {
            provider,
            input,
            table: TableRenderer::new(config.table_width),
        }
    }

    /// Runs the flow to completion.
    ///
    /// An empty stream listing is a valid terminal outcome: the flow prints
    /// a notice and returns `Ok` without prompting further.
    ///
    /// # Errors
    /// Returns provider fetch failures, transfer failures and IO errors on
    /// the input source. Validation failures never escape; they are
    /// consumed by the retry loops.
    pub async fn run(&mut self) -> Result<()> {
        let id = self.prompt_identifier()?;

        println!("Fetching streams...\n");
        let streams = self.provider.fetch_streams(&id).await?;
        if streams.is_empty() {
            println!("\nNo streams found for the provided video link");
            return Ok(());
        }

        let metadata = self.provider.fetch_metadata(&id).await?;
        self.display_streams(&metadata, &streams);

        let chosen = self.prompt_selection(streams.len())?;
        let stream = &streams[chosen - 1];

        let file_name = validate::build_file_name(&metadata.title, &stream.container);

        // Echo the chosen stream before asking where to put it.
        self.table.print_row(&STREAM_TABLE_HEADER);
        self.table.print_row(&[
            &chosen.to_string(),
            &stream.size_display(),
            &stream.container,
            &stream.bitrate_display(),
        ]);

        let destination = self.prompt_directory(&file_name)?;

        println!("Downloading File...");
        info!(destination = %destination.display(), "starting download");

        // The indicator finalizes on drop, success or error alike.
        let indicator = ProgressIndicator::new();
        self.provider
            .download(stream, &destination, &indicator)
            .await?;

        Ok(())
    }

    fn prompt_identifier(&mut self) -> Result<VideoIdentifier> {
        loop {
            let raw = self.read_line("\nEnter the Video URL/ID: ")?;
            match VideoIdentifier::parse(&raw) {
                Ok(id) => return Ok(id),
                Err(e) => println!("{e}"),
            }
        }
    }

    fn prompt_selection(&mut self, count: usize) -> Result<usize> {
        loop {
            let raw = self.read_line("\nSelect the # you want to download: ")?;
            // Non-numeric input counts as 0, which is always out of range.
            let chosen = raw.parse::<usize>().unwrap_or(0);
            match validate::validate_selection(chosen, count) {
                Ok(chosen) => return Ok(chosen),
                Err(e) => println!("{e}\n"),
            }
        }
    }

    fn prompt_directory(&mut self, file_name: &str) -> Result<PathBuf> {
        loop {
            let raw = self.read_line(
                "\nDirectory to save the downloaded file (leave blank if current directory): ",
            )?;
            match validate::validate_directory(&raw) {
                Ok(()) => {
                    let directory = if raw.is_empty() {
                        PathBuf::from(".")
                    } else {
                        PathBuf::from(raw)
                    };
                    return Ok(directory.join(file_name));
                }
                Err(e) => println!("{e}"),
            }
        }
    }

    fn display_streams(&self, metadata: &VideoMetadata, streams: &[StreamOption]) {
        println!(
            "{} by {} on {}",
            metadata.title,
            metadata.author,
            metadata.long_date()
        );
        self.table.print_divider();
        self.table.print_row(&STREAM_TABLE_HEADER);
        self.table.print_divider();
        self.table.print_divider();

        for (index, stream) in streams.iter().enumerate() {
            self.table.print_row(&[
                &(index + 1).to_string(),
                &stream.size_display(),
                &stream.container,
                &stream.bitrate_display(),
            ]);
        }
    }

    /// Prints a stable prompt and reads one trimmed line.
    ///
    /// EOF on the input source is an error rather than an infinite retry.
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Err(AppError::from(
                "input stream closed before the prompt was answered",
            ));
        }
        Ok(line.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressObserver;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::{Arc, Mutex};

    struct MockProvider {
        streams: Vec<StreamOption>,
        metadata: VideoMetadata,
        downloads: Arc<Mutex<Vec<(StreamOption, PathBuf)>>>,
    }

    #[async_trait]
    impl StreamProvider for MockProvider {
        async fn fetch_streams(&self, _id: &VideoIdentifier) -> Result<Vec<StreamOption>> {
            Ok(self.streams.clone())
        }

        async fn fetch_metadata(&self, _id: &VideoIdentifier) -> Result<VideoMetadata> {
            Ok(self.metadata.clone())
        }

        async fn download(
            &self,
            stream: &StreamOption,
            dest: &Path,
            progress: &dyn ProgressObserver,
        ) -> Result<()> {
            progress.report(0.5);
            progress.report(1.0);
            self.downloads
                .lock()
                .unwrap()
                .push((stream.clone(), dest.to_path_buf()));
            Ok(())
        }
    }

    fn stream(container: &str, n: u64) -> StreamOption {
        StreamOption {
            size: n * 1024 * 1024,
            container: container.to_string(),
            bitrate: n * 100_000,
            url: format!("https://cdn.example/{container}/{n}"),
        }
    }

    fn metadata(title: &str) -> VideoMetadata {
        VideoMetadata {
            title: title.to_string(),
            author: String::from("Test Channel"),
            upload_date: NaiveDate::from_ymd_opt(2020, 6, 1),
        }
    }

    fn session(
        streams: Vec<StreamOption>,
        metadata: VideoMetadata,
        input: &str,
    ) -> (
        InteractionLoop<MockProvider, Cursor<String>>,
        Arc<Mutex<Vec<(StreamOption, PathBuf)>>>,
    ) {
        let downloads = Arc::new(Mutex::new(Vec::new()));
        let provider = MockProvider {
            streams,
            metadata,
            downloads: Arc::clone(&downloads),
        };
        let session =
            InteractionLoop::new(provider, &Config::default(), Cursor::new(input.to_string()));
        (session, downloads)
    }

    #[tokio::test]
    async fn full_flow_downloads_the_selected_stream() {
        let streams = vec![stream("mp4", 1), stream("webm", 2), stream("mp4", 3)];
        let (mut session, downloads) =
            session(streams.clone(), metadata("Test Video"), "dQw4w9WgXcQ\n2\n\n");

        session.run().await.unwrap();

        let downloads = downloads.lock().unwrap();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].0, streams[1]);
        // Blank directory means the current directory; the extension comes
        // from the chosen stream's container.
        assert_eq!(downloads[0].1, PathBuf::from("./Test Video.webm"));
    }

    #[tokio::test]
    async fn empty_stream_listing_ends_the_run_without_prompting() {
        // Input holds only the identifier; any further prompt would hit EOF
        // and fail the run.
        let (mut session, downloads) = session(Vec::new(), metadata("unused"), "dQw4w9WgXcQ\n");

        session.run().await.unwrap();

        assert!(downloads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_selection_is_reprompted() {
        let streams = vec![stream("mp4", 1), stream("mp4", 2), stream("mp4", 3)];
        let (mut session, downloads) = session(
            streams.clone(),
            metadata("Test Video"),
            "dQw4w9WgXcQ\n99\nnope\n1\n\n",
        );

        session.run().await.unwrap();

        let downloads = downloads.lock().unwrap();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].0, streams[0]);
    }

    #[tokio::test]
    async fn invalid_identifier_is_reprompted() {
        let streams = vec![stream("mp4", 1)];
        let (mut session, downloads) = session(
            streams,
            metadata("Test Video"),
            "definitely not an id\ndQw4w9WgXcQ\n1\n\n",
        );

        session.run().await.unwrap();

        assert_eq!(downloads.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unsafe_title_downloads_under_its_slug() {
        let streams = vec![stream("mp4", 1)];
        let (mut session, downloads) =
            session(streams, metadata("a/b"), "dQw4w9WgXcQ\n1\n\n");

        session.run().await.unwrap();

        let downloads = downloads.lock().unwrap();
        assert_eq!(downloads[0].1, PathBuf::from("./a-b.mp4"));
    }

    #[tokio::test]
    async fn chosen_directory_is_joined_with_the_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let chosen = dir.path().join("saved");
        let input = format!("dQw4w9WgXcQ\n1\n{}\n", chosen.display());

        let streams = vec![stream("mp4", 1)];
        let (mut session, downloads) = session(streams, metadata("Test Video"), &input);

        session.run().await.unwrap();

        assert!(chosen.is_dir(), "directory should be created");
        let downloads = downloads.lock().unwrap();
        assert_eq!(downloads[0].1, chosen.join("Test Video.mp4"));
    }

    #[tokio::test]
    async fn exhausted_input_is_an_error_not_a_spin() {
        let (mut session, _downloads) = session(vec![stream("mp4", 1)], metadata("t"), "");

        let err = session.run().await.unwrap_err();
        assert!(err.to_string().contains("input stream closed"));
    }
}
