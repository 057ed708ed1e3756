use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use cinereveal::{
    CancelToken, CpuStarSurface, FsFetcher, IntroConfig, IntroSequence, Millis, Scheduled,
    VirtualClock, WallClock, WarpTransition,
};

#[derive(Parser, Debug)]
#[command(name = "cinereveal", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the intro at a given time after preload as a PNG.
    Frame(FrameArgs),
    /// Print the intro's phase transitions as JSON lines.
    Trace(TraceArgs),
    /// Run the warp transition offline and write frames as PNGs.
    Warp(WarpArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Intro config JSON. The built-in disaster intro is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Milliseconds elapsed since the sequence started.
    #[arg(long)]
    at_ms: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct TraceArgs {
    /// Intro config JSON. The built-in disaster intro is used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct WarpArgs {
    /// Intro config JSON supplying warp parameters and captions.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory receiving `warp_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Write every n-th frame.
    #[arg(long, default_value_t = 10)]
    every: u64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Trace(args) => cmd_trace(args),
        Command::Warp(args) => cmd_warp(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<(IntroConfig, PathBuf)> {
    match path {
        Some(p) => {
            let cfg = IntroConfig::from_path(p)
                .with_context(|| format!("load intro config '{}'", p.display()))?;
            let root = p
                .parent()
                .filter(|d| !d.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            Ok((cfg, root))
        }
        None => Ok((IntroConfig::default(), PathBuf::from("."))),
    }
}

/// Start the intro and wait in real time until preloading releases the gate.
fn preload(cfg: &IntroConfig, root: PathBuf) -> anyhow::Result<IntroSequence<FsFetcher>> {
    let fetcher = FsFetcher::new(root).context("create asset fetcher")?;
    let wall = WallClock::start();
    let mut intro = IntroSequence::start(cfg, fetcher, wall.now());
    while intro.ready_at().is_none() {
        let slice = wall.now() + Millis(50);
        wall.drive(
            &mut [&mut intro as &mut dyn Scheduled],
            slice,
            Duration::from_millis(5),
            || false,
        );
    }
    if let Some(report) = intro.preload_report() {
        tracing::info!(
            cause = ?report.cause,
            loaded = report.loaded,
            failed = report.failed,
            "preload finished"
        );
    }
    Ok(intro)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (cfg, root) = load_config(args.config.as_deref())?;
    let mut intro = preload(&cfg, root)?;
    intro.surface_ready(cfg.viewport);

    let ready = intro.ready_at().unwrap_or_default();
    let mut clock = VirtualClock::new(ready);
    let at = ready + Millis(args.at_ms);
    clock.run_until(&mut [&mut intro as &mut dyn Scheduled], at);

    let snapshot = intro.frame(at);
    let frame = cinereveal::paint_intro_frame(&snapshot, &cfg.title, cfg.viewport)?;
    cinereveal::save_png(&frame, [255, 255, 255, 255], &args.out)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} (phase {})",
        args.out.display(),
        snapshot.phase.as_deref().unwrap_or("-")
    );
    Ok(())
}

#[derive(serde::Serialize)]
struct TraceLine<'a> {
    at_ms: u64,
    since_ready_ms: u64,
    phase: &'a str,
    visible: bool,
    particles: Option<cinereveal::ParticleArchetype>,
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let (cfg, root) = load_config(args.config.as_deref())?;
    let mut intro = preload(&cfg, root)?;
    let ready = intro.ready_at().unwrap_or_default();
    let end = ready + cfg.timeline.duration();

    let mut clock = VirtualClock::new(ready);
    let mut last: Option<String> = None;
    loop {
        let phase = intro.phase().map(str::to_owned);
        if phase != last {
            if let Some(p) = phase.as_deref() {
                let line = TraceLine {
                    at_ms: clock.now().0,
                    since_ready_ms: clock.now().since(ready).0,
                    phase: p,
                    visible: intro.look().visible,
                    particles: intro.look().particles,
                };
                println!("{}", serde_json::to_string(&line).context("encode trace line")?);
            }
            last = phase;
        }
        if clock
            .step(&mut [&mut intro as &mut dyn Scheduled], end)
            .is_none()
        {
            break;
        }
    }
    Ok(())
}

fn cmd_warp(args: WarpArgs) -> anyhow::Result<()> {
    anyhow::ensure!(args.every > 0, "--every must be at least 1");
    let (cfg, _) = load_config(args.config.as_deref())?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let surface = CpuStarSurface::new(cfg.viewport)?;
    let mut navigated_to = None;
    let mut warp = WarpTransition::start(
        Some(surface),
        cfg.warp,
        cfg.captions.clone(),
        "/",
        |dest: &str| navigated_to = Some(dest.to_owned()),
        Millis(0),
        CancelToken::new(),
    )?;

    let end = cfg.warp.duration + cfg.warp.fps.frame_time(1);
    let mut clock = VirtualClock::new(Millis(0));
    let mut written = 0usize;
    let mut last_frame = 0;
    while let Some(at) = clock.step(&mut [&mut warp as &mut dyn Scheduled], end) {
        let frame_no = warp.renderer().frames_rendered();
        if frame_no == last_frame {
            continue;
        }
        last_frame = frame_no;
        if (frame_no - 1) % args.every != 0 {
            continue;
        }
        let Some(surface) = warp.renderer().surface() else {
            break;
        };
        let mut frame = surface.frame().clone();
        cinereveal::paint_captions(&mut frame, cfg.viewport, warp.captions(at))?;
        let path = args.out_dir.join(format!("warp_{frame_no:04}.png"));
        cinereveal::save_png(&frame, [0, 0, 0, 255], &path)
            .with_context(|| format!("write png '{}'", path.display()))?;
        written += 1;
    }

    drop(warp);
    eprintln!(
        "wrote {written} frames to {} (navigated: {})",
        args.out_dir.display(),
        navigated_to.as_deref().unwrap_or("no")
    );
    Ok(())
}
