use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use greedy_string_art::{
    compute,
    verboser::{Message, Verboser},
    Cancel, ExclusionRule, Float, Mode, Params, Report, Target,
};
use num_traits::AsPrimitive;
use thiserror::Error;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image (PNG or JPEG).
    #[arg()]
    input: PathBuf,

    /// JSON file with run parameters. Flags given on the command line win.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side in pixels of the square the image is resampled to.
    #[arg(short, long)]
    resolution: Option<u32>,

    /// Number of chords to draw (at least 25).
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Number of nails around the circle.
    #[arg(short, long)]
    nails: Option<usize>,

    /// Stroke width of the rendered preview.
    #[arg(long)]
    string_width: Option<f64>,

    /// Darkness one chord removes from a fully covered cell.
    #[arg(long)]
    string_strength: Option<f64>,

    #[arg(short, long)]
    mode: Option<ModeArg>,

    /// Iterations between colour changes in rgb mode.
    #[arg(long)]
    color_change_interval: Option<usize>,

    /// Nails a scan may not pick next. `nail` skips the current and previous
    /// nail; `shared-coordinate` also skips nails sharing an x or y with them,
    /// which reproduces sequences of the classic per-axis scan.
    #[arg(long)]
    exclusion: Option<ExclusionArg>,

    /// Precision of calculations (Single/Double).
    #[arg(short, long, default_value_t = Precision::Double)]
    precision: Precision,

    /// Output folder, defaults to `output/` next to the input.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pixels per cell of the PNG preview.
    #[arg(long, default_value_t = 3.0)]
    scale: f64,

    /// Print the effective parameters as JSON and exit.
    #[arg(long)]
    dump_config: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeArg {
    #[value(alias = "mono", alias = "gray")]
    Monochrome,
    #[value(alias = "color")]
    Rgb,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Monochrome => Mode::Monochrome,
            ModeArg::Rgb => Mode::Rgb,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ExclusionArg {
    /// Skip the current and previous nail only (default).
    Nail,
    /// Also skip nails sharing a coordinate with them.
    SharedCoordinate,
}

impl From<ExclusionArg> for ExclusionRule {
    fn from(value: ExclusionArg) -> Self {
        match value {
            ExclusionArg::Nail => ExclusionRule::Nail,
            ExclusionArg::SharedCoordinate => ExclusionRule::SharedCoordinate,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Precision {
    #[value(alias = "f32")]
    Single,
    #[value(alias = "f64")]
    Double,
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Double => f.write_str("double"),
        }
    }
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    StringArt(#[from] greedy_string_art::Error),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("invalid input path {}", .0.display())]
    InvalidPath(PathBuf),
}

impl CliError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Logs progress every few hundred iterations.
struct Progress {
    total: usize,
}

impl Verboser for Progress {
    fn verbose(&mut self, message: Message) {
        match message {
            Message::Computing(step) if step % 500 == 0 => {
                info!(step, total = self.total, "computing");
            }
            Message::Done(steps) => info!(steps, "done"),
            _ => {}
        }
    }
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let params = params(&args)?;
    if args.dump_config {
        println!("{}", params.to_json()?);
        return Ok(());
    }
    match args.precision {
        Precision::Single => with_precision::<f32>(&args, &params),
        Precision::Double => with_precision::<f64>(&args, &params),
    }
}

fn params(args: &Args) -> Result<Params, CliError> {
    let mut params = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(CliError::io(path))?;
            Params::from_json(&json)?
        }
        None => Params::default(),
    };
    if let Some(resolution) = args.resolution {
        params.resolution = resolution;
    }
    if let Some(iterations) = args.iterations {
        params.iterations = iterations;
    }
    if let Some(nails) = args.nails {
        params.nail_count = nails;
    }
    if let Some(width) = args.string_width {
        params.string_width = width;
    }
    if let Some(strength) = args.string_strength {
        params.string_strength = strength;
    }
    if let Some(mode) = args.mode {
        params.mode = mode.into();
    }
    if let Some(interval) = args.color_change_interval {
        params.color_change_interval = Some(interval);
    }
    if let Some(exclusion) = args.exclusion {
        params.exclusion = exclusion.into();
    }
    params.validate()?;
    Ok(params)
}

fn with_precision<S: Float>(args: &Args, params: &Params) -> Result<(), CliError>
where
    usize: AsPrimitive<S>,
    u32: AsPrimitive<S>,
    f32: AsPrimitive<S>,
    f64: AsPrimitive<S>,
    S: AsPrimitive<u32> + AsPrimitive<u8>,
{
    let target = Target::<S>::open(&args.input, params.resolution, params.mode)?;
    let mut progress = Progress {
        total: params.iterations,
    };
    let computation = compute(params, target, &mut progress, &Cancel::new())?;

    let file_name = args
        .input
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CliError::InvalidPath(args.input.clone()))?;
    let out_folder = match &args.output {
        Some(folder) => folder.clone(),
        None => args
            .input
            .parent()
            .unwrap_or(Path::new("."))
            .join("output"),
    };
    std::fs::create_dir_all(&out_folder).map_err(CliError::io(&out_folder))?;

    let svg_path = out_folder.join(format!("{file_name}.svg"));
    svg::save(
        &svg_path,
        &computation.build_svg(params.string_width as f32),
    )
    .map_err(CliError::io(&svg_path))?;

    let png_path = out_folder.join(format!("{file_name}.png"));
    computation
        .build_rgb(args.scale.as_())
        .save(&png_path)?;

    let canvas_path = out_folder.join(format!("{file_name}_canvas.png"));
    computation.build_canvas_image().save(&canvas_path)?;

    let report_path = out_folder.join(format!("{file_name}.txt"));
    std::fs::write(&report_path, Report::new(computation.sequence()).to_text())
        .map_err(CliError::io(&report_path))?;

    let sequence_path = out_folder.join(format!("{file_name}_sequence.json"));
    std::fs::write(
        &sequence_path,
        serde_json::to_string_pretty(computation.sequence())?,
    )
    .map_err(CliError::io(&sequence_path))?;

    info!(
        folder = %out_folder.display(),
        steps = computation.sequence().len(),
        "artifacts written"
    );
    Ok(())
}
