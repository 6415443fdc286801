//! Replays a session script against the simulated app
//!
//! Each step of the script is delivered at its timestamp; between steps the
//! clock advances in fixed frames so debounce timers fire and the banner
//! moves. Frames can be written as PNGs and snapshots dumped as JSON lines.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use unicorn_paradise::app::{AppController, AppError};
use unicorn_paradise::config::AppConfig;
use unicorn_paradise::input::Script;
use unicorn_paradise::ui::{SceneRenderer, save_png};

#[derive(Debug, Parser)]
#[command(name = "unicorn-paradise", version, about = "Replay a signup and playback session")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML session script; the built-in demo session when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write every frame as a PNG into this directory
    #[arg(long)]
    render_dir: Option<PathBuf>,

    /// Print a JSON snapshot after every step
    #[arg(long)]
    dump_state: bool,

    /// Clock step between frames, in milliseconds
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    frame_ms: u64,
}

fn main() -> ExitCode {
    let default_level = "info";
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_level))
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "session failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    let script = match &cli.script {
        Some(path) => Script::load(path)?,
        None => Script::demo(),
    };

    let renderer = match &cli.render_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| AppError::Io {
                path: dir.display().to_string(),
                source,
            })?;
            Some((SceneRenderer::with_font(&config.ui)?, dir.as_path()))
        }
        None => None,
    };

    info!(steps = script.steps.len(), end_ms = script.end().as_millis() as u64, "replaying session");
    let mut app = AppController::simulated(config);
    let frame = Duration::from_millis(cli.frame_ms);
    let end = script.end();
    let mut steps = script.steps.iter().peekable();
    let mut frame_at = Duration::ZERO;
    let mut frames = 0usize;

    loop {
        while let Some(step) = steps.next_if(|step| step.at() <= frame_at) {
            app.handle_event(step.event.clone(), step.at())?;
            if cli.dump_state {
                println!("{}", serde_json::to_string(&app.snapshot())?);
            }
        }

        app.advance(frame_at)?;
        if let Some((renderer, dir)) = &renderer {
            write_frame(&app, renderer, dir, frame_at)?;
            frames += 1;
        }

        if frame_at >= end {
            break;
        }
        frame_at += frame;
    }

    if cli.dump_state {
        println!("{}", serde_json::to_string(&app.snapshot())?);
    }
    info!(route = ?app.route(), frames, "session finished");
    Ok(())
}

fn write_frame(app: &AppController, renderer: &SceneRenderer, dir: &Path, at: Duration) -> Result<(), AppError> {
    let pixmap = renderer.render(&app.layout())?;
    let path = dir.join(format!("frame_{:06}.png", at.as_millis()));
    save_png(&pixmap, &path)?;
    Ok(())
}
