mod loader;
mod presenter;
mod reports;
mod script;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use routebook_engine::{
    DataLoader, Dataset, EmbeddedLoader, ExplorerEvent, Presenter, RouteExplorer,
    compute_schedule,
};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use loader::FileLoader;
use presenter::ReportPresenter;
use reports::{ReportFormat, write_routes};
use script::parse_script;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// List routes, checkpoints and external origins
    Routes,
    /// Print the ETA schedule for one route
    Eta,
    /// Replay a scripted sequence of operator events
    Explore,
}

#[derive(Debug, Parser)]
#[command(name = "routebook", version)]
#[command(about = "Explore checkpoint routes and compute ETA schedules")]
struct Args {
    /// What to run: routes, eta, or explore
    #[arg(long, value_enum, default_value_t = RunMode::Eta)]
    mode: RunMode,

    /// Dataset JSON file (defaults to the bundled dataset)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Route id (defaults to the first route)
    #[arg(long)]
    route: Option<String>,

    /// Start point: a checkpoint id or an external origin such as a depot
    #[arg(long)]
    origin: Option<String>,

    /// Start time as HH:MM (defaults to the dataset default)
    #[arg(long)]
    start: Option<String>,

    /// Comma-separated events for explore mode, e.g. "route:river,click:ford,next,eta:06:00@ford"
    #[arg(long, default_value = "")]
    script: String,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.output.is_some() || args.report != ReportFormat::Console {
        colored::control::set_override(false);
    }

    let dataset = load_dataset(args.config.as_deref())?;
    let mut output_target = OutputTarget::new(args.output.clone())?;
    if args.report == ReportFormat::Console {
        announce_banner(&mut output_target)?;
    }

    match args.mode {
        RunMode::Routes => write_routes(&mut output_target, args.report, &dataset)?,
        RunMode::Eta => {
            output_target = run_eta(&args, &dataset, output_target)?;
        }
        RunMode::Explore => {
            output_target = run_explore(&args, dataset, output_target)?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_dataset(config: Option<&Path>) -> Result<Dataset> {
    match config {
        Some(path) => {
            let loader = FileLoader::new(path);
            loader
                .load_dataset()
                .with_context(|| format!("loading dataset from {}", loader.path().display()))
        }
        None => EmbeddedLoader
            .load_dataset()
            .context("loading bundled dataset"),
    }
}

fn announce_banner(out: &mut dyn Write) -> Result<()> {
    writeln!(out, "{}", "🧭 Routebook".bright_cyan().bold())?;
    writeln!(out, "{}", "============".cyan())?;
    Ok(())
}

fn run_eta(args: &Args, dataset: &Dataset, output_target: OutputTarget) -> Result<OutputTarget> {
    let route = match args.route.as_deref() {
        Some(id) => {
            let route = dataset.catalog.get_or_first(id);
            if route.id != id {
                log::debug!("unknown route `{id}`; using `{}`", route.id);
            }
            route
        }
        None => dataset.catalog.first(),
    };
    let origin = dataset
        .defaults
        .origin_for(args.origin.as_deref(), route, &dataset.origins);
    let start = dataset.defaults.start_time_for(args.start.as_deref());

    let schedule = compute_schedule(&start, &origin, route, &dataset.legs);
    let mut presenter = ReportPresenter::new(output_target, args.report);
    if schedule.is_ready() {
        presenter.render_schedule(&schedule);
    } else {
        presenter.prompt_start_time();
    }
    presenter.finish().context("writing ETA report")
}

fn run_explore(args: &Args, dataset: Dataset, output_target: OutputTarget) -> Result<OutputTarget> {
    let mut events = Vec::new();
    if let Some(route_id) = &args.route {
        events.push(ExplorerEvent::SelectRoute {
            route_id: route_id.clone(),
        });
    }
    events.extend(parse_script(&args.script).context("parsing --script")?);

    let presenter = ReportPresenter::new(output_target, args.report);
    let mut explorer = RouteExplorer::new(dataset, presenter);
    explorer.start();
    for event in events {
        explorer.handle(event);
    }
    log::debug!("explore finished after {} frames", explorer.presenter().frames());
    explorer
        .into_presenter()
        .finish()
        .context("writing explore report")
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
