//! Scroll engine entry point.
//!
//! Runs the engine headless: states are stepped by the fixed-rate scheduler
//! against the wall clock and draw commands are collected into a
//! [`DrawList`]. Content comes from the `assets` directory in the config.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --skip-intro --level 1-1 --seconds 10
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use log::{error, info};

use scrollengine::error::Result;
use scrollengine::game::Game;
use scrollengine::resources::assets::DirSource;
use scrollengine::resources::audio::AudioBridge;
use scrollengine::resources::defloader::load_content;
use scrollengine::resources::gameconfig::GameConfig;
use scrollengine::resources::worldtime::SystemClock;
use scrollengine::states::GameState;
use scrollengine::states::basegame::BaseGame;
use scrollengine::states::intro::Intro;
use scrollengine::systems::render::DrawList;

/// Side-scrolling platformer engine
#[derive(Parser)]
#[command(version, about = "Fixed-step platformer engine core")]
struct Cli {
    /// Configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Content directory, overriding the config.
    #[arg(long, value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Go straight to the game, skipping intro and menu.
    #[arg(long)]
    skip_intro: bool,

    /// Level to start in, skipping the world map.
    #[arg(long, value_name = "NAME")]
    level: Option<String>,

    /// Stop after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    seconds: Option<f64>,

    /// Print every registered tile with its collision type and exit.
    #[arg(long)]
    dump_tiles: bool,
}

fn load_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = GameConfig::with_path(&cli.config);
    if cli.config.exists() {
        config.load_from_file()?;
    } else {
        info!("{} not found, using defaults", cli.config.display());
    }
    if let Some(assets) = &cli.assets {
        config.assets = assets.clone();
    }
    if let Some(level) = &cli.level {
        config.start_level = Some(level.clone());
    }
    config.validate()?;
    Ok(config)
}

fn dump_tiles(config: &GameConfig) -> Result<()> {
    let content = load_content(&DirSource::new(&config.assets))?;
    for (id, def) in content.tiles.iter() {
        if id.is_empty() {
            continue;
        }
        println!("{}\t{:?}", id, def.collision);
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    if cli.dump_tiles {
        return dump_tiles(&config);
    }

    let assets = Box::new(DirSource::new(&config.assets));
    let audio = AudioBridge::spawn(config.voices as usize);
    let mut game = Game::new(config, SystemClock::new(), DrawList::new(), assets, audio)?;

    if cli.skip_intro {
        game.push_state(|| GameState::BaseGame(BaseGame::new()));
    } else {
        game.push_state(|| GameState::Intro(Intro::new()));
    }

    match cli.seconds {
        Some(s) => {
            game.run_for(Duration::from_secs_f64(s.max(0.0)));
            game.request_quit();
            game.pump();
        }
        None => game.run(),
    }
    info!(
        "stopped after {} ticks and {} frames",
        game.time().ticks,
        game.time().frames
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
