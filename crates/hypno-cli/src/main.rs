use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hypno_lib::{
    config::{load_config, ChartConfig},
    detect_rem_markers,
    io::{self as series_io, load_series, series_to_json},
    mapping::Viewport,
    ChartController, JitterConfig, Series,
};
use serde::Serialize;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

mod bitmap;

use bitmap::BitmapSurface;

#[derive(Parser)]
#[command(
    name = "hypno",
    version,
    about = "hypno: synthetic sleep heart-rate charts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum SeriesFormat {
    Json,
    Csv,
}

/// Where the night comes from: config file, overrides and seed.
#[derive(Args, Debug, Clone)]
struct NightArgs {
    /// TOML chart configuration; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
    /// Disable every random perturbation
    #[arg(long)]
    no_jitter: bool,
    #[arg(long)]
    points: Option<usize>,
    /// Minutes between samples
    #[arg(long)]
    interval: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic night and print it (or write it to --out)
    Generate {
        #[command(flatten)]
        night: NightArgs,
        #[arg(long, value_enum, default_value = "json")]
        format: SeriesFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Detect REM markers in a series file, or in a freshly generated night
    Detect {
        /// Series file (.csv or .json)
        #[arg(long)]
        input: Option<PathBuf>,
        #[command(flatten)]
        night: NightArgs,
        /// Rolling average window in samples
        #[arg(long)]
        window: Option<usize>,
        /// Minimum samples between markers
        #[arg(long)]
        min_spacing: Option<usize>,
    },
    /// Print the sample under a pointer position, or null
    Cursor {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, default_value_t = 960.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        #[command(flatten)]
        night: NightArgs,
    },
    /// Render the chart to a PNG via plotters
    Render {
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 960)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
        /// Annotate REM markers
        #[arg(long)]
        markers: bool,
        #[arg(long, requires = "cursor_y")]
        cursor_x: Option<f64>,
        #[arg(long, requires = "cursor_x")]
        cursor_y: Option<f64>,
        #[command(flatten)]
        night: NightArgs,
    },
    /// Print the effective configuration as TOML
    Config {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Generate { night, format, out } => cmd_generate(&night, format, out.as_deref())?,
        Commands::Detect {
            input,
            night,
            window,
            min_spacing,
        } => cmd_detect(input.as_deref(), &night, window, min_spacing)?,
        Commands::Cursor {
            x,
            y,
            width,
            height,
            night,
        } => cmd_cursor(x, y, width, height, &night)?,
        Commands::Render {
            out,
            width,
            height,
            markers,
            cursor_x,
            cursor_y,
            night,
        } => {
            let cursor = cursor_x.zip(cursor_y);
            cmd_render(&out, width, height, markers, cursor, &night)?
        }
        Commands::Config { config } => cmd_config(config.as_deref())?,
    }
    Ok(())
}

fn resolve_config(night: &NightArgs) -> Result<ChartConfig> {
    let mut config = match &night.config {
        Some(path) => load_config(path)?,
        None => ChartConfig::default(),
    };
    if let Some(points) = night.points {
        config.point_count = points;
    }
    if let Some(interval) = night.interval {
        config.sample_interval = interval;
    }
    if night.no_jitter {
        config.jitter = JitterConfig {
            transition_samples: config.jitter.transition_samples,
            ..JitterConfig::none()
        };
    }
    Ok(config)
}

fn build_controller(night: &NightArgs) -> Result<ChartController> {
    let config = resolve_config(night)?;
    let controller = match night.seed {
        Some(seed) => ChartController::with_seed(config, seed)?,
        None => ChartController::from_entropy(config)?,
    };
    Ok(controller)
}

fn cmd_generate(night: &NightArgs, format: SeriesFormat, out: Option<&Path>) -> Result<()> {
    let controller = build_controller(night)?;
    let series = controller.current_series();
    match (format, out) {
        (SeriesFormat::Json, Some(path)) => {
            fs::write(path, series_to_json(series)?)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {} samples to {}", series.len(), path.display());
        }
        (SeriesFormat::Csv, Some(path)) => {
            series_io::save_series_csv(path, series)?;
            log::info!("wrote {} samples to {}", series.len(), path.display());
        }
        (SeriesFormat::Json, None) => println!("{}", series_to_json(series)?),
        (SeriesFormat::Csv, None) => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            series_io::write_series_csv(&mut lock, series)?;
            lock.flush()?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct MarkerRow {
    sample_index: usize,
    time: f64,
    value: f64,
}

#[derive(Serialize)]
struct DetectOutput {
    sample_count: usize,
    window_size: usize,
    min_spacing: usize,
    markers: Vec<MarkerRow>,
}

fn cmd_detect(
    input: Option<&Path>,
    night: &NightArgs,
    window: Option<usize>,
    min_spacing: Option<usize>,
) -> Result<()> {
    let config = resolve_config(night)?;
    let series: Series = match input {
        Some(path) => load_series(path)?,
        None => build_controller(night)?.current_series().clone(),
    };
    let window_size = window.unwrap_or(config.rolling_window_size);
    let min_spacing = min_spacing.unwrap_or(config.min_marker_spacing);
    let markers = detect_rem_markers(&series, window_size, min_spacing)?;
    let rows = markers
        .iter()
        .filter_map(|m| {
            series.get(m.sample_index).map(|s| MarkerRow {
                sample_index: m.sample_index,
                time: s.time,
                value: s.value,
            })
        })
        .collect();
    let out = DetectOutput {
        sample_count: series.len(),
        window_size,
        min_spacing,
        markers: rows,
    };
    println!("{}", serde_json::to_string(&out)?);
    Ok(())
}

fn cmd_cursor(x: f64, y: f64, width: f64, height: f64, night: &NightArgs) -> Result<()> {
    let mut controller = build_controller(night)?;
    controller.set_viewport(Viewport::new(width, height, controller.config().margin));
    let readout = controller.cursor_readout(x, y);
    println!("{}", serde_json::to_string(&readout)?);
    Ok(())
}

fn cmd_render(
    out: &Path,
    width: u32,
    height: u32,
    markers: bool,
    cursor: Option<(f64, f64)>,
    night: &NightArgs,
) -> Result<()> {
    let mut controller = build_controller(night)?;
    controller.resize(width as f64, height as f64);
    controller.set_markers_visible(markers);
    let mut surface = BitmapSurface::new(out);
    controller.render(&mut surface, cursor)?;
    log::info!("rendered chart to {}", out.display());
    Ok(())
}

fn cmd_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(path) => load_config(path)?,
        None => ChartConfig::default(),
    };
    print!("{}", config.to_toml()?);
    Ok(())
}
