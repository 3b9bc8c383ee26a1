//! Generate, measure and sweep exception vs error-code workloads.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};
use exspeed::{generate, simulate, GraphSpec, DEFAULT_SEED};
use exspeed_harness::{
    Builder, DirectBuilder, EventRecorder, EventSink, Harness, MesonBuilder, MultiplexSink,
    PointResult, Presets, ResultMatrix, SweepConfig, SweepRecord, TracingSink,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "exspeed")]
#[command(about = "Compare exception and error-code propagation cost on generated call graphs")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write both program variants to disk
    Generate {
        #[command(flatten)]
        workload: WorkloadArgs,

        /// Output directory; sources land in <out>/cpp and <out>/plainc
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Print the tally both programs will report
    Simulate {
        #[command(flatten)]
        workload: WorkloadArgs,
    },
    /// Build and time a single point
    Measure {
        #[command(flatten)]
        workload: WorkloadArgs,

        #[command(flatten)]
        run: RunArgs,

        /// Also report unstripped and stripped executable sizes
        #[arg(long)]
        sizes: bool,

        /// Check each program's output against the simulated tally
        #[arg(long)]
        verify: bool,
    },
    /// Measure every depth × error-percent point and print the verdict matrix
    Sweep {
        /// Start from a named preset (quick, standard, deep)
        #[arg(long)]
        preset: Option<String>,

        /// Comma-separated graph depths
        #[arg(long, value_delimiter = ',')]
        depths: Option<Vec<u32>>,

        /// Comma-separated error percents
        #[arg(long, value_delimiter = ',')]
        error_percents: Option<Vec<u32>>,

        /// Rounds compiled into each program
        #[arg(long)]
        rounds: Option<u32>,

        /// Random seed baked into both programs
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        run: RunArgs,

        /// Write a JSON record of the sweep
        #[arg(long)]
        json: Option<PathBuf>,

        /// Print the grid with depth and error-percent labels
        #[arg(long)]
        labeled: bool,
    },
}

#[derive(Args, Debug)]
struct WorkloadArgs {
    /// Node chain depth
    #[arg(long, default_value = "1000")]
    depth: u32,

    /// Top-level invocations per run
    #[arg(long, default_value = "1000")]
    rounds: u32,

    /// Failure probability of the terminal node, in percent
    #[arg(long, default_value = "1")]
    error_percent: u32,

    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

impl WorkloadArgs {
    fn spec(&self) -> anyhow::Result<GraphSpec> {
        Ok(GraphSpec::new(self.depth, self.rounds, self.error_percent)?.with_seed(self.seed))
    }
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Timed runs per program; the fastest is kept
    #[arg(long)]
    trials: Option<u32>,

    /// Relative difference below which a verdict is marginal
    #[arg(long)]
    threshold: Option<f64>,

    #[arg(long, value_enum, default_value_t = BuilderKind::Meson)]
    builder: BuilderKind,

    /// Parent directory for per-point sources and build trees
    #[arg(long, default_value = "./tmp/exspeed")]
    work_dir: PathBuf,

    /// Keep each point's sources and binaries after measuring
    #[arg(long)]
    keep: bool,
}

impl RunArgs {
    fn apply(&self, mut config: SweepConfig) -> SweepConfig {
        if let Some(trials) = self.trials {
            config = config.with_trials(trials);
        }
        if let Some(threshold) = self.threshold {
            config = config.with_marginal_threshold(threshold);
        }
        config
            .with_work_dir(&self.work_dir)
            .with_keep_artifacts(self.keep)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum BuilderKind {
    /// meson setup + ninja
    Meson,
    /// cc / c++ invoked directly
    Direct,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Generate { workload, out } => run_generate(&workload, &out),
        Command::Simulate { workload } => {
            println!("{}", simulate(&workload.spec()?));
            Ok(())
        }
        Command::Measure {
            workload,
            run,
            sizes,
            verify,
        } => run_measure(&workload, &run, sizes, verify),
        Command::Sweep {
            preset,
            depths,
            error_percents,
            rounds,
            seed,
            run,
            json,
            labeled,
        } => {
            let mut config = match preset {
                Some(name) => match Presets::by_name(&name) {
                    Some(config) => config,
                    None => {
                        let names: Vec<_> = Presets::all().into_iter().map(|(n, _)| n).collect();
                        bail!("unknown preset '{}' (available: {})", name, names.join(", "));
                    }
                },
                None => Presets::quick(),
            };
            if let Some(depths) = depths {
                config = config.with_depths(depths);
            }
            if let Some(error_percents) = error_percents {
                config = config.with_error_percents(error_percents);
            }
            if let Some(rounds) = rounds {
                config = config.with_rounds(rounds);
            }
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            let config = run.apply(config);
            match run.builder {
                BuilderKind::Meson => {
                    run_sweep(config, MesonBuilder::default(), json.as_deref(), labeled)
                }
                BuilderKind::Direct => {
                    run_sweep(config, DirectBuilder::default(), json.as_deref(), labeled)
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run_generate(workload: &WorkloadArgs, out: &Path) -> anyhow::Result<()> {
    let spec = workload.spec()?;
    let (exception, error_code) = generate(&spec);
    for tree in [&exception, &error_code] {
        let dir = out.join(tree.variant.dir_name());
        tree.write_to(&dir)
            .with_context(|| format!("writing {} sources to {}", tree.variant, dir.display()))?;
        println!(
            "{}: {} files, {} bytes -> {}",
            tree.variant,
            tree.files.len(),
            tree.total_bytes(),
            dir.display()
        );
    }
    Ok(())
}

fn run_measure(
    workload: &WorkloadArgs,
    run: &RunArgs,
    sizes: bool,
    verify: bool,
) -> anyhow::Result<()> {
    let config = run
        .apply(SweepConfig::minimal())
        .with_rounds(workload.rounds)
        .with_seed(workload.seed)
        .with_depths([workload.depth])
        .with_error_percents([workload.error_percent])
        .with_size_inspection(sizes)
        .with_tally_verification(verify);
    config.validate()?;

    let point = match run.builder {
        BuilderKind::Meson => Harness::new(config, MesonBuilder::default())
            .measure_point(workload.depth, workload.error_percent)?,
        BuilderKind::Direct => Harness::new(config, DirectBuilder::default())
            .measure_point(workload.depth, workload.error_percent)?,
    };
    print_point(&point);
    Ok(())
}

fn run_sweep<B: Builder>(
    config: SweepConfig,
    builder: B,
    json: Option<&Path>,
    labeled: bool,
) -> anyhow::Result<()> {
    let recorder = Arc::new(EventRecorder::new());
    let sink: Arc<dyn EventSink> = if json.is_some() {
        Arc::new(MultiplexSink::new(vec![
            Arc::new(TracingSink) as Arc<dyn EventSink>,
            recorder.clone(),
        ]))
    } else {
        Arc::new(TracingSink)
    };

    let harness = Harness::new(config, builder).with_sink(sink);
    let outcome = harness.sweep()?;

    print!("{}", sweep_report(&outcome.matrix, labeled));
    if let Some(path) = json {
        let record = SweepRecord::new(harness.config(), &outcome, recorder.take());
        record
            .export_to_file(path)
            .with_context(|| format!("writing sweep record to {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote sweep record");
    }
    Ok(())
}

/// One line of verdict codes per depth, or the labeled grid.
fn sweep_report(matrix: &ResultMatrix, labeled: bool) -> String {
    if labeled {
        matrix.render_labeled()
    } else {
        matrix.render()
    }
}

fn print_point(point: &PointResult) {
    println!("depth {}, error {}%", point.depth, point.error_percent);
    println!("  error code: {:?}", point.error_code);
    println!("  exception:  {:?}", point.exception);
    println!(
        "  verdict:    {} ({}, ratio {:.3})",
        point.classification.verdict.code(),
        point.classification.verdict,
        point.classification.ratio
    );
    if let Some(sizes) = point.sizes {
        println!(
            "  error code size: {} unstripped, {} stripped",
            sizes.error_code.unstripped, sizes.error_code.stripped
        );
        println!(
            "  exception size:  {} unstripped, {} stripped",
            sizes.exception.unstripped, sizes.exception.stripped
        );
    }
    if let Some(dir) = &point.artifacts {
        println!("  artifacts:  {}", dir.display());
    }
}
