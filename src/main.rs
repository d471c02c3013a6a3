use anyhow::Context as _;
use clap::Parser;
use eframe::NativeOptions;
use media_deck::app::{MediaPlayerApp, WINDOW_TITLE};
use media_deck::config::Config;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("media_deck=info")),
        )
        .init();

    let config = Config::parse();
    ffmpeg_next::init().context("failed to initialize FFmpeg")?;
    tracing::info!(?config, "starting");

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(MediaPlayerApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("window closed with error: {}", e))
}
