//! tidebloom: generative-art and data-visualization sketches.
//!
//! Interactive sketches run in the terminal; chart sketches (and any sketch
//! given `--headless` or `--out`) render a fixed number of frames to a GIF or
//! a directory of PNG frames.
//!
//! Run: `tidebloom flower`, `tidebloom rainfall-chart --out rain.gif`

#![cfg_attr(test, allow(clippy::unwrap_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use tidebloom::anim::View;
use tidebloom::app::{
    file_sink, Config, CrosstermEvents, InputHandler, RenderLoop, RunSummary, ScriptedEvents, Sketch, TerminalSink,
};
use tidebloom::dataset::{IrisTable, RainfallHistory, RainfallTable, TideSeries};
use tidebloom::sketches::{BiovisSketch, FlowerSketch, RainfallChartSketch, RainfallMapSketch, SpiralSketch};

/// tidebloom: tidal spirals, iris flowers and rainfall maps
#[derive(Parser, Debug)]
#[command(name = "tidebloom")]
#[command(version)]
#[command(about = "Generative-art and data-visualization sketches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    sketch: Command,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Render to a file instead of the terminal
    #[arg(long, global = true)]
    headless: bool,

    /// Frames to render (headless: default from config or the sketch's cycle)
    #[arg(long, global = true)]
    frames: Option<u64>,

    /// Output path: `.gif` for an animated GIF, anything else a PNG directory
    #[arg(short, long, global = true)]
    out: Option<PathBuf>,

    /// Seed for synthetic data and randomized effects
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Show chart sketches in the terminal instead of writing a file
    #[arg(long, global = true)]
    watch: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Tide readings on a turning spiral
    Spiral,
    /// Iris species as animated flowers
    Flower {
        /// Start on one species (0-2) instead of all three
        #[arg(long)]
        species: Option<usize>,
    },
    /// Monthly rainfall bubbles on a world map
    RainfallMap,
    /// A century of monthly rainfall: density map and line chart
    RainfallChart,
    /// Heartbeat rings and growing stems
    Biovis,
}

impl Command {
    const fn name(self) -> &'static str {
        match self {
            Self::Spiral => "spiral",
            Self::Flower { .. } => "flower",
            Self::RainfallMap => "rainfall-map",
            Self::RainfallChart => "rainfall-chart",
            Self::Biovis => "biovis",
        }
    }

    const fn is_chart(self) -> bool {
        matches!(self, Self::RainfallMap | Self::RainfallChart | Self::Biovis)
    }
}

/// Where frames go and when to stop, resolved from CLI and config.
#[derive(Debug)]
struct Plan {
    headless: bool,
    out: PathBuf,
    frames: Option<u64>,
    mouse: bool,
    view: Option<View>,
}

impl Plan {
    fn new(cli: &Cli, config: &Config) -> Self {
        let headless = cli.headless || cli.out.is_some() || (cli.sketch.is_chart() && !cli.watch);
        let out = cli.out.clone().unwrap_or_else(|| PathBuf::from(format!("{}.gif", cli.sketch.name())));
        let frames = cli.frames.or_else(|| headless.then_some(config.global.frames));
        let view = match cli.sketch {
            Command::Flower { species: Some(i) } => Some(View::Single(i)),
            _ => None,
        };
        Self { headless, out, frames, mouse: config.global.mouse, view }
    }

    /// Render one full cycle unless `--frames` says otherwise.
    fn use_cycle(&mut self, cli: &Cli, cycle: u64) {
        if self.headless && cli.frames.is_none() {
            self.frames = Some(cycle);
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }

    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = Config::discover(cli.config.as_deref()).context("loading configuration")?;
    let seed = cli.seed.unwrap_or(config.global.seed);
    let mut plan = Plan::new(cli, &config);
    let scales = config.mapping;

    let summary = match cli.sketch {
        Command::Spiral => {
            let tide = match &config.data.tide_csv {
                Some(path) => TideSeries::from_csv(path).with_context(|| format!("loading {}", path.display()))?,
                None => TideSeries::synthetic(),
            };
            run_sketch(SpiralSketch::new(tide, scales, config.spiral.clone(), seed), &plan)?
        }
        Command::Flower { .. } => {
            let path = &config.data.iris_csv;
            let stats = IrisTable::load(path)
                .and_then(|table| table.species_stats())
                .with_context(|| format!("loading {}", path.display()))?;
            run_sketch(FlowerSketch::new(stats, scales, config.flower.clone(), seed), &plan)?
        }
        Command::RainfallMap => {
            let table = RainfallTable::load(
                config.data.rainfall_url.as_deref(),
                config.data.rainfall_token.as_deref(),
                config.data.fetch_timeout_secs,
                seed,
            )
            .context("loading rainfall")?;
            plan.use_cycle(cli, 12);
            run_sketch(RainfallMapSketch::new(table, scales, config.rainfall_map.clone()), &plan)?
        }
        Command::RainfallChart => {
            let history = RainfallHistory::synthetic(seed);
            plan.use_cycle(cli, history.frame_count() as u64);
            run_sketch(RainfallChartSketch::new(history, scales, config.rainfall_chart.clone())?, &plan)?
        }
        Command::Biovis => {
            let sketch = BiovisSketch::new(config.biovis.clone())?;
            plan.use_cycle(cli, sketch.signals().len() as u64);
            run_sketch(sketch, &plan)?
        }
    };

    if plan.headless {
        println!("Saved {} frames to {}", summary.frames, plan.out.display());
    }
    Ok(())
}

fn run_sketch<S: Sketch>(sketch: S, plan: &Plan) -> Result<RunSummary> {
    if plan.headless {
        let delay_ms = (1000.0 / sketch.frame_rate()).round() as u32;
        let sink = file_sink(&plan.out, delay_ms).with_context(|| format!("creating {}", plan.out.display()))?;
        let mut render = RenderLoop::new(sketch, sink, ScriptedEvents::new())?.headless();
        if let Some(frames) = plan.frames {
            render = render.with_frame_budget(frames);
        }
        if let Some(view) = plan.view {
            render = render.with_view(view);
        }
        return Ok(render.run()?);
    }

    let sink = TerminalSink::open(plan.mouse).context("opening terminal")?;
    let events = CrosstermEvents::new(InputHandler::new(plan.mouse));
    let mut render = RenderLoop::new(sketch, sink, events)?;
    if let Some(frames) = plan.frames {
        render = render.with_frame_budget(frames);
    }
    if let Some(view) = plan.view {
        render = render.with_view(view);
    }
    let summary = render.run()?;
    info!("{} frames in {:.1}s", summary.frames, summary.elapsed);
    Ok(summary)
}
