pub mod app;
pub mod config;
pub mod dialog;
pub mod engine;
pub mod error;
pub mod player;
pub mod playlist;
pub mod shell;
pub mod snapshot;
pub mod theme;
pub mod transport;
pub mod ui;

pub use engine::{EngineEvent, MediaEngine, MediaInfo};
pub use player::FfmpegEngine;
pub use shell::Shell;
