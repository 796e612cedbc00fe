use anyhow::Result;
use fish_id_core::ExtractConfig;
use fish_id_cv::{Device, VideoFrames, YoloModel, run_batch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

/// Optional first argument: a JSON config file overriding the defaults
fn load_config() -> Result<ExtractConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => ExtractConfig::load(path),
        None => Ok(ExtractConfig::default()),
    }
}

fn run() -> Result<()> {
    let config = load_config()?;

    let device = Device::select(config.device)?;
    let mut model = YoloModel::load(&config.weights, device, config.input_size, config.num_classes)?;

    let stats = run_batch(&config, &mut model, |path| VideoFrames::open(path))?;

    info!(
        videos = stats.videos,
        frames = stats.totals.frames_processed,
        written = stats.totals.crops_written,
        skipped_existing = stats.totals.already_exists,
        failed = stats.totals.failed,
        "Batch complete"
    );
    println!("Finished extracting bounding boxes!");
    Ok(())
}

fn main() {
    init_logging();

    if let Err(e) = run() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
