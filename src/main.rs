use crossterm::execute;
use crossterm::terminal::SetTitle;
use std::io;
use tracing::{error, info};
use tubefetch::error::Result;
use tubefetch::{Config, InteractionLoop, YtDlpProvider};

/// Main entry point for the application.
///
/// # Steps
/// 1. Initializes logging with file, line numbers and thread IDs
/// 2. Prints the intro banner
/// 3. Builds the default configuration and the yt-dlp provider
/// 4. Runs the interactive flow on stdin
///
/// # Errors
/// Exits with code 1 when the provider cannot be constructed or the flow
/// fails on a non-recoverable error. Validation failures never reach here;
/// the loop retries them.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .init();

    info!("Starting application...");
    display_intro();

    let config = Config::default();
    let provider = YtDlpProvider::new(config.clone())?;
    let stdin = io::stdin();
    let mut session = InteractionLoop::new(provider, &config, stdin.lock());

    if let Err(e) = session.run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }

    info!("Application completed successfully");
    Ok(())
}

/// Displays the banner and sets the terminal title.
fn display_intro() {
    let _ = execute!(io::stdout(), SetTitle("Video Downloader CLI"));
    println!("=========================================");
    println!("=        Video Downloader CLI           =");
    println!("=========================================");
}
