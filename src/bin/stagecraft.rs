use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stagecraft", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a scene, run frames and print the allocation of every named actor.
    Run(RunArgs),
    /// Load a scene, run frames and report the reactive actor under a stage point.
    Pick(PickArgs),
    /// Parse, validate and build a scene without running it.
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Number of frames to run.
    #[arg(long, default_value_t = 1)]
    frames: u64,

    /// Frame delta in milliseconds; defaults to one frame at the scene's fps.
    #[arg(long)]
    dt_ms: Option<f64>,

    /// Print the final frame report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct PickArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Stage x coordinate.
    #[arg(long)]
    x: f64,

    /// Stage y coordinate.
    #[arg(long)]
    y: f64,

    /// Frames to run before hit-testing.
    #[arg(long, default_value_t = 1)]
    frames: u64,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Pick(args) => cmd_pick(args),
        Command::Check(args) => cmd_check(args),
    }
}

fn load_scene(path: &Path) -> anyhow::Result<stagecraft::LoadedScene> {
    let desc = stagecraft::SceneDescription::from_path(path)
        .with_context(|| format!("load scene '{}'", path.display()))?;
    let scene = desc
        .build()
        .with_context(|| format!("build scene '{}'", path.display()))?;
    Ok(scene)
}

fn run_frames(
    stage: &mut stagecraft::Stage,
    frames: u64,
    dt_ms: Option<f64>,
) -> Option<stagecraft::FrameReport> {
    let dt = dt_ms.unwrap_or_else(|| stage.clock().fixed_step_ms());
    let mut last = None;
    for _ in 0..frames {
        let report = stage.frame(dt);
        let quit = report.quit_requested;
        last = Some(report);
        if quit {
            break;
        }
    }
    last
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.scene)?;
    let report = run_frames(&mut scene.stage, args.frames, args.dt_ms);

    if args.json {
        let report = report.context("no frames were run (--frames 0)")?;
        let out = serde_json::to_string_pretty(&report).context("serialize frame report")?;
        println!("{out}");
        return Ok(());
    }

    let graph = scene.stage.scene();
    for (name, &id) in &scene.names {
        let b = graph
            .allocation(id)
            .with_context(|| format!("read allocation of '{name}'"))?;
        println!(
            "{name}: x={} y={} w={} h={}",
            b.x0,
            b.y0,
            b.width(),
            b.height()
        );
    }
    if let Some(report) = report {
        eprintln!(
            "ran {} frame(s), {} transition(s) running",
            report.frame, report.transitions_running
        );
    }
    Ok(())
}

fn cmd_pick(args: PickArgs) -> anyhow::Result<()> {
    let mut scene = load_scene(&args.scene)?;
    run_frames(&mut scene.stage, args.frames, None);

    let graph = scene.stage.scene();
    match graph.pick(stagecraft::Point::new(args.x, args.y)) {
        Some(id) => {
            let name = graph.name(id)?.unwrap_or("<unnamed>");
            println!("{name}");
        }
        None => println!("<none>"),
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let scene = load_scene(&args.scene)?;
    eprintln!(
        "ok: {} actor(s), {} named",
        scene.stage.scene().len(),
        scene.names.len()
    );
    Ok(())
}
