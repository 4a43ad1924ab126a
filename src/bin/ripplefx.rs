use std::{
    path::{Path, PathBuf},
    rc::Rc,
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use ripplefx::{ContentRegion as _, Rasterizer as _};

#[derive(Parser, Debug)]
#[command(name = "ripplefx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture a region as a PNG.
    Capture(CaptureArgs),
    /// Play a full transition and write every composited frame as a PNG.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct CaptureArgs {
    /// Region element tree (JSON).
    #[arg(long)]
    region: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Transition config (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the rasterizer and draw the fallback placeholder.
    #[arg(long)]
    fallback: bool,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Region element tree (JSON).
    #[arg(long)]
    region: PathBuf,

    /// Directory for `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Simulated display refresh rate.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Transition config (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Presentation mode being switched to (logged only).
    #[arg(long, value_enum, default_value_t = ModeChoice::Card)]
    mode: ModeChoice,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    List,
    Card,
    Grid,
}

impl From<ModeChoice> for ripplefx::PresentationMode {
    fn from(m: ModeChoice) -> Self {
        match m {
            ModeChoice::List => Self::List,
            ModeChoice::Card => Self::Card,
            ModeChoice::Grid => Self::Grid,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Capture(args) => cmd_capture(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn read_config(path: Option<&Path>) -> anyhow::Result<ripplefx::TransitionConfig> {
    match path {
        Some(p) => ripplefx::TransitionConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display())),
        None => Ok(ripplefx::TransitionConfig::default()),
    }
}

fn read_region(path: &Path) -> anyhow::Result<Rc<ripplefx::StaticRegion>> {
    let region = ripplefx::StaticRegion::from_path(path)
        .with_context(|| format!("load region '{}'", path.display()))?;
    Ok(Rc::new(region))
}

fn write_png(path: &Path, width: u32, height: u32, rgba: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        rgba,
        width,
        height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref())?;
    let region = read_region(&args.region)?;
    let size = ripplefx::PixelSize::from_rect(region.bounds()).context("region size")?;
    let fallback = ripplefx::FallbackSynthesizer::new(cfg.load_font()?);

    let buffer = if args.fallback {
        fallback.synthesize(region.as_ref(), size)
    } else {
        let rasterizer = ripplefx::SceneRasterizer::new(cfg.capture_opts()?);
        let captured = rasterizer
            .capture(region.clone(), size)
            .and_then(futures::executor::block_on);
        match captured {
            Ok(buffer) => buffer,
            Err(e) => {
                tracing::warn!(error = %e, "capture failed; drawing fallback");
                fallback.synthesize(region.as_ref(), size)
            }
        }
    };

    let stats = buffer.stats();
    write_png(&args.out, buffer.width(), buffer.height(), buffer.data())?;
    eprintln!(
        "wrote {} ({}x{}, {:.1}% opaque)",
        args.out.display(),
        buffer.width(),
        buffer.height(),
        stats.opaque_percent()
    );
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.fps > 0, "--fps must be > 0");
    let cfg = read_config(args.config.as_deref())?;
    let region = read_region(&args.region)?;
    let slot = ripplefx::RegionSlot::with_region(region);
    let clock = ripplefx::ManualClock::new();

    let rasterizer = ripplefx::SceneRasterizer::new(cfg.capture_opts()?);
    let max_frames = cfg.duration_ms.saturating_mul(u64::from(args.fps)) / 1000 + 2;
    let mut ctl = ripplefx::TransitionController::new(cfg, rasterizer, slot, clock.clone())?;
    ctl.trigger(true, args.mode.into());

    let frame_dt = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let mut written = 0u64;
    let mut ticks = 0u64;
    while ctl.wants_frame() {
        anyhow::ensure!(ticks <= max_frames, "transition did not finish in {max_frames} frames");
        ticks += 1;
        clock.advance(frame_dt);
        if let ripplefx::FrameOutcome::Rendered { .. } = ctl.pump()
            && let Some(surface) = ctl.surface()
        {
            let img = surface.to_rgba_image()?;
            let path = args.out_dir.join(format!("frame_{written:04}.png"));
            write_png(&path, img.width(), img.height(), img.as_raw())?;
            written += 1;
        }
    }

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}
