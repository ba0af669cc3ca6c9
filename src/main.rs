use anyhow::{anyhow, Context, Result};
use clap::Parser;
use headcount::config::AppConfig;
use headcount::pipeline::{handoff, PipelineSettings, RenderLoop, SlotLabeler, SnapshotHandler};
use headcount::{displayers, sources};
use headcount_core::{shutdown_signal, BoxedDisplayer, Registry, SharedWriter};
use log::{error, info, warn};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// headcount - live people-count series per sensor device
#[derive(Parser, Debug, Clone)]
#[command(name = "headcount")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Feed source (file or stdin)
    #[arg(long = "source", value_name = "SOURCE")]
    source: Option<String>,

    /// Collection file read by the file feed
    #[arg(long = "path", value_name = "PATH")]
    path: Option<PathBuf>,

    /// Length of the time window in seconds
    #[arg(long = "window-seconds", value_name = "N")]
    window_seconds: Option<u64>,

    /// Number of display slots
    #[arg(long = "display-limit", value_name = "N")]
    display_limit: Option<usize>,

    /// Displayer for every slot (text or json)
    #[arg(long = "displayer", value_name = "ID")]
    displayer: Option<String>,

    /// Render the first frame and exit
    #[arg(long = "once")]
    once: bool,

    /// Configuration file to load instead of the default one
    #[arg(value_name = "CONFIG_FILE")]
    config_file: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(source) = &self.source {
            config.feed.source = source.clone();
        }
        if let Some(path) = &self.path {
            config.feed.path = Some(path.clone());
            // A path on its own implies the file feed
            if self.source.is_none() {
                config.feed.source = "file".to_string();
            }
        }
        if let Some(window_seconds) = self.window_seconds {
            config.pipeline.window_seconds = window_seconds;
        }
        if let Some(display_limit) = self.display_limit {
            config.display.display_limit = display_limit;
        }
        if let Some(displayer) = &self.displayer {
            config.display.displayer = displayer.clone();
        }
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config_file {
        Some(path) => AppConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load().unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }),
    };
    cli.apply_overrides(&mut config);
    config.validate()?;
    Ok(config)
}

fn create_slots(
    registry: &Registry,
    config: &AppConfig,
    writer: SharedWriter,
) -> Result<Vec<BoxedDisplayer>> {
    (0..config.display.display_limit)
        .map(|slot| {
            registry.create_displayer(
                &config.display.displayer,
                config.display.grid.position(slot),
                writer.clone(),
            )
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting headcount v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let settings = Arc::new(PipelineSettings::from_config(&config.pipeline)?);

    let mut registry = Registry::new();
    sources::register_all(&mut registry);
    displayers::register_all(&mut registry);

    let writer: SharedWriter = Arc::new(Mutex::new(std::io::stdout()));
    let slots = create_slots(&registry, &config, writer)?;
    let mut render = RenderLoop::new(
        slots,
        SlotLabeler::new(config.display.friendly_names.clone()),
    );

    let mut feed = registry.create_feed(&config.feed)?;
    info!(
        "Feed: {} ({}), window {}s, {} slots",
        feed.metadata().name,
        feed.metadata().description,
        settings.window_seconds,
        render.display_limit()
    );

    let (publisher, receiver) = handoff();
    let listener = Arc::new(SnapshotHandler::new(settings, publisher)).into_listener();
    let (shutdown_handle, shutdown) = shutdown_signal();

    // Detached: a blocking stdin read cannot be interrupted, so the feed
    // thread is never joined. Its exit drops the publisher and closes the
    // render loop.
    let feed_shutdown = shutdown.clone();
    std::thread::Builder::new()
        .name("feed".to_string())
        .spawn(move || {
            if let Err(e) = feed.run(listener, feed_shutdown) {
                error!("Feed stopped: {}", e);
            }
        })
        .map_err(|e| anyhow!("Failed to start feed thread: {}", e))?;

    let stale_after = config.display.stale_after_secs.map(Duration::from_secs);
    let once = cli.once;
    let mut render_task = tokio::task::spawn_blocking(move || {
        if once {
            render.run_once(&receiver, &shutdown);
            render.stats()
        } else {
            render.run(&receiver, &shutdown, stale_after)
        }
    });

    let stats = tokio::select! {
        result = &mut render_task => result?,
        signal = tokio::signal::ctrl_c() => {
            if interrupted(signal) {
                info!("Shutting down");
                shutdown_handle.trigger();
            }
            // Otherwise the handle lives until the feed closes the loop
            render_task.await?
        }
    };

    info!(
        "Rendered {} frames ({} redraws, {} failed, {} stale marks, {} superseded)",
        stats.frames, stats.redraws, stats.failed_redraws, stats.stale_marks, stats.superseded
    );
    Ok(())
}

/// Whether a Ctrl-C wait ended because the user pressed it
///
/// A failed listener is not a request to stop.
fn interrupted(signal: std::io::Result<()>) -> bool {
    match signal {
        Ok(()) => true,
        Err(e) => {
            warn!("Failed to listen for Ctrl-C, running until the feed ends: {}", e);
            false
        }
    }
}
