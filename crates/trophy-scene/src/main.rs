use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use trophy_camera::{Catalog, SelectionPolicy};
use trophy_scene::{run_tour, SceneConfig, TourOptions, TrophyScene};

/// Preview the trophy camera tour without a browser
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seconds of tour to simulate
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// Simulated frame rate
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Click at this time in seconds (repeatable)
    #[arg(long = "click-at")]
    clicks: Vec<f32>,

    /// Selection policy: round_robin or shuffled_pool
    #[arg(long)]
    policy: Option<SelectionPolicy>,

    /// Seed for the shuffled order
    #[arg(long)]
    seed: Option<u64>,

    /// Motion catalog in RON (built-in motions when omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Scene configuration file
    #[arg(long, default_value = "trophy.ron")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = SceneConfig::load_from(&args.config)?;
    if let Some(policy) = args.policy {
        config.sequencer.policy = policy;
    }
    if args.seed.is_some() {
        config.sequencer.seed = args.seed;
    }

    let catalog = match &args.catalog {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog {:?}", path))?;
            Arc::new(Catalog::from_ron(&text)?)
        }
        None => Catalog::reference(),
    };

    log::info!(
        "Simulating {}s at {} fps ({} motions, {:?})",
        args.seconds,
        args.fps,
        catalog.len(),
        config.sequencer.policy
    );

    let mut scene = TrophyScene::new(config, catalog);
    let entries = run_tour(
        &mut scene,
        &TourOptions {
            seconds: args.seconds,
            fps: args.fps,
            clicks: args.clicks,
        },
    );

    for entry in &entries {
        println!("{}", entry);
    }
    Ok(())
}
