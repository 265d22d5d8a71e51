//! `los`: line-of-sight visibility analysis from the command line.
//!
//! Loads a target surface and any number of environment meshes, classifies
//! samples over the target from a single viewpoint, and writes the results.

mod cli;

use std::error::Error;

use cli::CLIOptions;
use config::constants::DEFAULT_TARGET_NAME;
use log::{info, LevelFilter};
use los_analysis::export::{
    save_colored_ply, save_results_csv, save_summary_json, save_triangle_categories_csv,
};
use los_analysis::{apply_categories, CategoryPalette, VisibilityAnalysis};
use los_mesh::{load_mesh, OccluderScene};
use simplelog::TermLogger;

fn main() -> Result<(), Box<dyn Error>> {
    let options: CLIOptions = argh::from_env();

    TermLogger::init(
        options.verbose.unwrap_or(LevelFilter::Info),
        simplelog::ConfigBuilder::default()
            .set_time_level(LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    run(&options)?;
    Ok(())
}

fn run(options: &CLIOptions) -> los_analysis::Result<()> {
    // Preconditions before any geometry is read
    let settings = options.settings()?;
    let observer = options.observer()?;

    let mut target = load_mesh(&options.target)?;
    let mut scene = OccluderScene::new();
    scene.add_object(DEFAULT_TARGET_NAME, target.clone())?;
    for (i, path) in options.environment.iter().enumerate() {
        let name = format!("environment-{i}:{}", path.display());
        scene.add_object(name, load_mesh(path)?)?;
    }
    info!(
        "Scene: {} objects, {} triangles",
        scene.len(),
        scene.triangle_count()
    );

    let report = VisibilityAnalysis::new(observer, settings)
        .with_seed(options.seed)
        .run_scene(&scene, DEFAULT_TARGET_NAME, options.execution_mode())?;

    save_results_csv(&options.output, &report.results)?;

    let colored = apply_categories(&mut target, &report.results);
    info!(
        "Categorized {colored} of {} target triangles",
        target.triangle_count()
    );
    if let Some(path) = &options.categories {
        save_triangle_categories_csv(path, &report.triangle_categories)?;
    }
    if let Some(path) = &options.ply {
        save_colored_ply(
            path,
            &target,
            &report.triangle_categories,
            &CategoryPalette::default(),
        )?;
    }
    if let Some(path) = &options.summary {
        save_summary_json(path, &report.summary)?;
    }

    Ok(())
}
