mod app;
mod assets;
mod config;
mod core;
mod game;
mod screens;
mod ui;

use crate::assets::{AssetManager, DEFAULT_FONT, DEFAULT_OVERLAY};
use crate::core::{gfx, input::LineInput, launch::ShellLauncher};
use crate::game::parsing::index_file::{LoadOptions, load_catalog};
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install logger immediately, then set runtime max level from config after loading it.
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .try_init();
    // Startup default when config is missing or malformed.
    log::set_max_level(log::LevelFilter::Warn);

    config::load();
    if let Some(root) = std::env::args_os().nth(1) {
        config::set_root(PathBuf::from(root));
    }
    let cfg = config::get();
    log::set_max_level(cfg.log_level.as_level_filter());

    let assets = AssetManager::new(&cfg.asset_dir);
    let opts = LoadOptions {
        viewport_width: cfg.display_width,
        default_overlay: assets.builtin(DEFAULT_OVERLAY),
        default_font: assets.builtin(DEFAULT_FONT),
    };
    let catalog = load_catalog(&cfg.root, &opts, &assets).inspect_err(|e| {
        log::error!("Failed to initialize title grid: {e}");
    })?;

    let screen = screens::select_title::init(catalog, cfg.display_width, cfg.display_height);
    let renderer: gfx::SoftwareRenderer =
        gfx::init_software(cfg.display_width, cfg.display_height, cfg.frame_dump_path);
    let input = LineInput::new(std::io::stdin().lock());
    app::App::new(screen, input, renderer, ShellLauncher::new(cfg.shell)).run();
    Ok(())
}
