mod app;
mod catalog;
mod config;
mod constants;
mod gallery;
mod i18n;
mod image_loader;
mod layout;
mod paint;
mod paths;
mod preload;
mod reveal;
mod sample;
mod virtual_grid;

use app::GalleryApp;
use catalog::PhotoCatalog;
use clap::Parser;
use config::{Cli, GalleryConfig};
use constants::{INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH};
use eframe::egui;
use paths::AppPaths;
use std::path::PathBuf;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let lang_forced = cli.lang.is_some();

    let app_paths = AppPaths::from_project_dirs();
    if let Some(paths) = &app_paths {
        if let Err(err) = paths.ensure_dirs_exist() {
            log::warn!("Could not create application directories: {err}");
        }
    }

    let config_path = cli
        .config
        .clone()
        .or_else(|| app_paths.as_ref().map(AppPaths::config_file));
    let file_config = config_path
        .as_deref()
        .map(GalleryConfig::load_or_default)
        .unwrap_or_default();
    let config = cli.apply(file_config);

    let catalog = match resolve_manifest(&config, app_paths.as_ref()) {
        Some(path) => PhotoCatalog::load(&path).unwrap_or_else(|err| {
            log::error!("{err}");
            PhotoCatalog::default()
        }),
        None => {
            log::info!("No photo manifest configured");
            PhotoCatalog::default()
        }
    };
    if catalog.is_empty() {
        log::warn!("The photo catalog is empty; the gallery will show nothing");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([INITIAL_WINDOW_WIDTH, INITIAL_WINDOW_HEIGHT])
            .with_min_inner_size([320.0, 480.0]),
        ..Default::default()
    };

    let seed = rand::random::<u64>();
    eframe::run_native(
        "Vow Gallery",
        options,
        Box::new(move |cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(GalleryApp::new(
                cc,
                catalog,
                config,
                lang_forced,
                seed,
            )))
        }),
    )
}

/// Configured manifest, or the per-user default one if it exists.
fn resolve_manifest(config: &GalleryConfig, app_paths: Option<&AppPaths>) -> Option<PathBuf> {
    config.manifest.clone().or_else(|| {
        app_paths
            .map(AppPaths::default_manifest)
            .filter(|path| path.exists())
    })
}
