use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use dynawave::{
    Direction, FrameScheduler as _, HostElement, ManualScheduler, RecordingSurface, Sequencer,
    WaveSettings, decode_seed, encode_seed, generate, rasterize, standalone_svg, svg_markup,
};

#[derive(Parser, Debug)]
#[command(name = "dynawave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the path data of one generated wave.
    Path(WaveArgs),
    /// Print the widget's `<svg>` markup for one generated wave.
    Svg(SvgArgs),
    /// Rasterize one generated wave to a PNG.
    Png(PngArgs),
    /// Encode path data into a seed token.
    Encode {
        /// Path data to encode.
        path: String,
    },
    /// Decode a seed token back into path data.
    Decode {
        /// Token produced by `encode`.
        token: String,
    },
    /// Simulate an animation and print one JSON line per frame.
    Frames(FramesArgs),
}

#[derive(Args, Debug)]
struct WaveArgs {
    /// Settings JSON file; flags below override its values.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Edge the wave faces.
    #[arg(long)]
    direction: Option<Direction>,

    /// Number of anchors (at least 2).
    #[arg(long)]
    points: Option<usize>,

    /// Amplitude multiplier.
    #[arg(long)]
    variance: Option<f64>,

    /// Seed string for a reproducible shape.
    #[arg(long)]
    seed: Option<String>,

    /// Pin both ends of the wave to the baseline.
    #[arg(long)]
    start_end_zero: bool,
}

#[derive(Args, Debug)]
struct SvgArgs {
    #[command(flatten)]
    wave: WaveArgs,

    /// `class` attribute for the svg element.
    #[arg(long)]
    class: Option<String>,

    /// `id` attribute for the svg element.
    #[arg(long)]
    id: Option<String>,

    /// Extra inline style for the svg element.
    #[arg(long)]
    style: Option<String>,
}

#[derive(Args, Debug)]
struct PngArgs {
    #[command(flatten)]
    wave: WaveArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Scale factor applied to the logical canvas.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Fill color (any SVG color).
    #[arg(long, default_value = "#1d4ed8")]
    fill: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FramesMode {
    /// Continuous loop via `play`.
    Play,
    /// One regenerate transition.
    Regenerate,
}

#[derive(Args, Debug)]
struct FramesArgs {
    #[command(flatten)]
    wave: WaveArgs,

    /// Which transition to drive.
    #[arg(long, value_enum, default_value_t = FramesMode::Play)]
    mode: FramesMode,

    /// Transition duration in milliseconds (defaults to the settings' duration).
    #[arg(long)]
    duration_ms: Option<f64>,

    /// Simulated frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Number of completed transitions to simulate (play mode).
    #[arg(long, default_value_t = 1)]
    cycles: usize,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct FrameLine<'a> {
    frame: usize,
    timestamp_ms: f64,
    d: &'a str,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Path(args) => cmd_path(args),
        Command::Svg(args) => cmd_svg(args),
        Command::Png(args) => cmd_png(args),
        Command::Encode { path } => {
            println!("{}", encode_seed(&path));
            Ok(())
        }
        Command::Decode { token } => {
            let d = decode_seed(&token).context("token is not a valid wave seed")?;
            println!("{d}");
            Ok(())
        }
        Command::Frames(args) => cmd_frames(args),
    }
}

fn load_settings(args: &WaveArgs) -> anyhow::Result<WaveSettings> {
    let mut settings = match &args.settings {
        Some(path) => read_settings(path)?,
        None => WaveSettings::default(),
    };
    if let Some(direction) = args.direction {
        settings.direction = direction;
    }
    if let Some(points) = args.points {
        settings.point_count = points;
    }
    if let Some(variance) = args.variance {
        settings.variance = variance;
    }
    if let Some(seed) = &args.seed {
        settings.seed = Some(seed.clone());
    }
    if args.start_end_zero {
        settings.start_end_zero = true;
    }
    Ok(settings.normalized())
}

fn read_settings(path: &Path) -> anyhow::Result<WaveSettings> {
    WaveSettings::from_path(path).with_context(|| format!("load settings '{}'", path.display()))
}

fn one_wave(settings: &WaveSettings) -> String {
    let mut rng = settings.random();
    generate(&settings.wave_config(), rng.as_mut())
}

fn cmd_path(args: WaveArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args)?;
    println!("{}", one_wave(&settings));
    Ok(())
}

fn cmd_svg(args: SvgArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.wave)?;
    let host = HostElement {
        class: args.class,
        id: args.id,
        style: args.style,
    };
    println!("{}", svg_markup(&settings, &host, &one_wave(&settings)));
    Ok(())
}

fn cmd_png(args: PngArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.wave)?;
    if !(args.scale.is_finite() && args.scale > 0.0) {
        anyhow::bail!("--scale must be a positive number");
    }

    let canvas = settings.canvas();
    let doc = standalone_svg(canvas, settings.direction, &one_wave(&settings), &args.fill);
    let width = (f64::from(canvas.width) * args.scale).round().max(1.0) as u32;
    let height = (f64::from(canvas.height) * args.scale).round().max(1.0) as u32;
    let img = rasterize(&doc, width, height)?;

    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &img.data,
        img.width,
        img.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let settings = load_settings(&args.wave)?;
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("--fps must be a positive number");
    }
    let dt_ms = 1000.0 / args.fps;

    let mut seq = Sequencer::new(
        settings.wave_config(),
        settings.random(),
        ManualScheduler::default(),
        RecordingSurface::default(),
    )
    .with_default_duration(settings.duration_ms);

    let target_cycles = match args.mode {
        FramesMode::Play => {
            seq.play(args.duration_ms);
            args.cycles.max(1)
        }
        FramesMode::Regenerate => {
            seq.generate_new_wave(args.duration_ms);
            1
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut frame = 0usize;
    while seq.surface().completions.len() < target_cycles {
        if !seq.step_frame(dt_ms) {
            break;
        }
        let timestamp_ms = seq.scheduler().now_ms();
        if let Some(d) = seq.surface().last_path() {
            let line = FrameLine {
                frame,
                timestamp_ms,
                d,
            };
            serde_json::to_writer(&mut out, &line).context("write frame json")?;
            writeln!(out).context("write frame json")?;
        }
        // Only the newest frame is needed; keep memory flat over long runs.
        let surface = seq.surface_mut();
        let keep = surface.paths.len().saturating_sub(1);
        surface.paths.drain(..keep);
        frame += 1;
    }

    for event in &seq.surface().completions {
        serde_json::to_writer(&mut out, event).context("write completion json")?;
        writeln!(out).context("write completion json")?;
    }
    Ok(())
}
