use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::info;

use hypetracker::config::{Config, DEFAULT_CONFIG_PATH};
use hypetracker::logging;
use hypetracker::sentiment::LexiconAnalyzer;
use hypetracker::HypeTracker;

#[derive(Parser, Debug)]
#[command(name = "hypetracker", about = "Live chat sentiment and hype metrics for a channel")]
struct Args {
    /// Channel to join (overrides the config file)
    #[arg(short, long)]
    channel: Option<String>,

    /// Path to the configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Seconds between metric reports
    #[arg(long, default_value_t = 5)]
    poll_interval: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(channel) = args.channel {
        config.channel = channel;
    }
    logging::setup_logging(config.log_level)?;

    let channel = config.channel.clone();
    let mut tracker = HypeTracker::new(config, Arc::new(LexiconAnalyzer::new()));
    tracker.start(&channel)?;
    info!("Tracking #{}; press Ctrl+C to stop", channel);

    let mut poll = tokio::time::interval(Duration::from_secs(args.poll_interval.max(1)));
    loop {
        tokio::select! {
            _ = poll.tick() => {
                let metrics = tracker.metrics();
                info!(
                    "Hype: {:.3} | Messages: {} | Breakdown: {:?} | State: {:?}",
                    metrics.hype_score,
                    metrics.message_count,
                    metrics.sentiment_breakdown,
                    tracker.session_state()
                );
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down.");
                break;
            }
        }
    }

    tracker.stop().await;
    Ok(())
}
