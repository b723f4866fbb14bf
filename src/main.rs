use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use shotlog::{RunOutcome, SessionConfig};

/// Take periodic screenshots and save them into a single PDF.
#[derive(Parser, Debug)]
#[command(name = "shotlog")]
#[command(about = "Take periodic screenshots and bind them into a PDF")]
struct Args {
    /// Screenshot interval in seconds
    #[arg(short, long, default_value_t = shotlog::config::DEFAULT_RATE_SECS)]
    rate: u32,

    /// Total duration in seconds (default: 30 minutes)
    #[arg(short, long, default_value_t = shotlog::config::DEFAULT_DURATION_SECS)]
    duration: u32,

    /// Output directory for the PDF file
    #[arg(short, long, default_value = shotlog::config::DEFAULT_OUTPUT_DIR)]
    output: String,

    /// Custom name for the PDF file (default: screenshots_TIMESTAMP.pdf)
    #[arg(short, long)]
    name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = SessionConfig::new(args.rate, args.duration, args.output, args.name);
    config.validate()?;

    println!(
        "Starting screenshot capture: {} screenshots at {} second intervals",
        config.frame_count(),
        config.rate_secs
    );
    println!(
        "Total duration: {} seconds ({:.1} minutes)",
        config.duration_secs,
        f64::from(config.duration_secs) / 60.0
    );
    println!("Output PDF will be saved to: {}", config.output_dir.display());
    println!("Press Ctrl+C to stop the capture early");

    // Ctrl+C cancels the loop; the run then finalizes with the frames
    // captured so far.
    let cancel = CancellationToken::new();
    let handler = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nScreenshot capture interrupted by user");
            handler.cancel();
        }
    });

    #[cfg(feature = "screen-capture")]
    {
        let mut source = shotlog::capture::screen::ScreenSource::new();
        match shotlog::run_session(&config, &mut source, &cancel).await? {
            RunOutcome::Document(summary) => {
                let shown = std::path::absolute(&summary.path).unwrap_or(summary.path);
                println!("PDF saved to: {}", shown.display());
            }
            RunOutcome::NoFrames => {
                println!("No screenshots were taken, no PDF created.");
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "screen-capture"))]
    {
        let _ = cancel;
        Err(anyhow::anyhow!(
            "Screen capture not available - enable with: cargo run --features screen-capture"
        ))
    }
}
