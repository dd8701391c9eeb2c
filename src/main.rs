use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use lumengrid::channels::{self, CHANNEL_NAMES};
use lumengrid::config::{self, PlaneConfig, SphereConfig};
use lumengrid::field::{NormalizedField, ScalarField};
use lumengrid::section::{horizontal_section, vertical_section};
use lumengrid::shading::{RenderControl, SphereScene};

const DEFAULT_LOGGING_LEVEL: &str = "info";

#[derive(Parser)]
#[command(name = "lumengrid")]
#[command(about = "Compute illumination and shading fields over pixel grids", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Illuminance on a plane from a point light inside a circular mask
    Plane {
        /// TOML scene file; built-in defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for the image and section files
        #[arg(short, long, default_value = "out")]
        out: PathBuf,
    },
    /// Blinn-Phong shaded sphere seen through a virtual screen
    Sphere {
        /// TOML scene file; built-in defaults are used when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for the image and section files
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        /// Number of lit pixels to re-trace and report
        #[arg(short, long, default_value_t = 5)]
        samples: usize,
    },
    /// Per-channel mean brightness of an image file
    Channels {
        image: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or(DEFAULT_LOGGING_LEVEL)).init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Plane { config, out } => run_plane(config.as_deref(), &out)?,
        Commands::Sphere {
            config,
            out,
            samples,
        } => run_sphere(config.as_deref(), &out, samples)?,
        Commands::Channels { image } => run_channels(&image)?,
    }

    info!("done");
    Ok(())
}

fn load_config<T>(path: Option<&Path>) -> Result<T>
where
    T: Default + for<'de> serde::Deserialize<'de>,
{
    match path {
        Some(path) => config::load(path).with_context(|| format!("failed to load {}", path.display())),
        None => Ok(T::default()),
    }
}

fn run_plane(config_path: Option<&Path>, out: &Path) -> Result<()> {
    let config: PlaneConfig = load_config(config_path)?;
    let scene = config.validate()?;

    info!(
        "computing planar illumination at {} ({} pixels)",
        scene.resolution,
        scene.resolution.pixel_count()
    );
    let field = scene.compute()?;

    info!("illuminance at diagnostic points (W/m²):");
    for point in scene.diagnostic_points() {
        info!(
            "  {:<6} ({:.1}, {:.1}) mm: {:.7}",
            point.label, point.x, point.y, point.illumination
        );
    }
    log_stats("illuminance inside the mask", &field);

    save_outputs(out, "illumination.png", &field.normalize())
}

fn run_sphere(config_path: Option<&Path>, out: &Path, samples: usize) -> Result<()> {
    let config: SphereConfig = load_config(config_path)?;
    let scene = config.validate()?;

    info!(
        "shading sphere at {} with {} light(s)",
        scene.resolution,
        scene.lights.len()
    );
    let field = render_with_progress(&scene)?;

    info!("sample points:");
    for (i, sample) in scene.sample_points(&field, samples)?.iter().enumerate() {
        match sample.world {
            Some(p) => info!(
                "  {}: pixel {:?}, world [{:.2}, {:.2}, {:.2}] mm, brightness {:.7}",
                i + 1,
                sample.pixel,
                p.x,
                p.y,
                p.z,
                sample.brightness
            ),
            None => info!("  {}: sphere not visible", i + 1),
        }
    }
    log_stats("brightness on the sphere", &field);

    save_outputs(out, "brightness.png", &field.normalize())
}

/// Render on a worker thread while the main thread drives a progress bar.
fn render_with_progress(scene: &SphereScene) -> Result<ScalarField> {
    let control = RenderControl::new();
    let bar = ProgressBar::new(scene.resolution.height as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} rows [{elapsed_precise}]")?,
    );

    let field = thread::scope(|s| {
        let worker = s.spawn(|| scene.compute_with(&control));
        while !worker.is_finished() {
            bar.set_position(control.rows_done() as u64);
            thread::sleep(Duration::from_millis(50));
        }
        worker.join()
    });
    bar.finish_and_clear();

    match field {
        Ok(result) => Ok(result?),
        Err(_) => anyhow::bail!("render thread panicked"),
    }
}

fn log_stats(label: &str, field: &ScalarField) {
    let stats = field.lit_stats();
    info!(
        "{label}: max {:.7}, min (non-zero) {:.7}, mean (non-zero) {:.7} over {} pixels",
        stats.max, stats.min, stats.mean, stats.lit_cells
    );
}

fn save_outputs(out: &Path, image_name: &str, normalized: &NormalizedField) -> Result<()> {
    fs::create_dir_all(out).with_context(|| format!("failed to create {}", out.display()))?;

    let image_path = out.join(image_name);
    normalized.save(&image_path)?;
    horizontal_section(normalized.pixels())?.write_csv(out.join("section_horizontal.csv"))?;
    vertical_section(normalized.pixels())?.write_csv(out.join("section_vertical.csv"))?;

    info!("saved {} and cross sections to {}", image_path.display(), out.display());
    Ok(())
}

fn run_channels(path: &Path) -> Result<()> {
    let analysis = channels::analyze_file(path)
        .with_context(|| format!("failed to analyze {}", path.display()))?;
    let summary = &analysis.summary;

    info!("{}", summary.name.to_uppercase());
    info!("  resolution: {}x{}", summary.width, summary.height);
    info!(
        "  format:     {}",
        summary
            .format
            .map(|f| format!("{f:?}").to_uppercase())
            .unwrap_or_else(|| "unknown".to_string())
    );
    info!("  pixels:     {}", summary.pixel_count());
    info!("  file size:  {:.2} MB", summary.file_size_mib());

    for (name, average) in CHANNEL_NAMES.iter().zip(&analysis.averages) {
        info!("  mean {name:<5}: {average:.2}");
    }
    Ok(())
}
