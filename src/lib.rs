/// An interactive video download CLI.
///
/// This library drives a prompt-based flow: the user supplies a video
/// URL/ID, picks one of the combined audio/video encodings from a table,
/// chooses a save directory and watches the transfer progress in place.
///
/// # Architecture
///
/// The application is structured into several key components:
/// - `Config`: Application configuration management
/// - `InteractionLoop`: The prompt/validate/retry flow
/// - `StreamProvider`: Capability trait for the external video service
/// - `YtDlpProvider`: Concrete provider backed by the yt-dlp executable
/// - `TableRenderer`: Fixed-width table layout for the stream listing
/// - `ProgressIndicator`: In-place terminal progress rendering
///
/// # Example
/// ```no_run
/// use std::io;
/// use tubefetch::{Config, InteractionLoop, YtDlpProvider};
///
/// async fn example() {
///     let config = Config::default();
///     let provider = YtDlpProvider::new(config.clone()).unwrap();
///     let stdin = io::stdin();
///     let mut session = InteractionLoop::new(provider, &config, stdin.lock());
///     // session.run().await ...
/// }
/// ```
pub mod config;
pub mod error;
pub mod interaction;
pub mod progress;
pub mod provider;
pub mod table;
pub mod validate;
pub mod ytdlp;

// Re-export commonly used items
pub use config::Config;
pub use error::AppError;
pub use interaction::InteractionLoop;
pub use progress::{ProgressIndicator, ProgressObserver};
pub use provider::{StreamOption, StreamProvider, VideoIdentifier, VideoMetadata};
pub use table::TableRenderer;
pub use ytdlp::YtDlpProvider;
