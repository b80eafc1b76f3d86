//! listbench CLI

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use listbench::bench::run_child;
use listbench::config::LoggingConfig;
use listbench::types::ForkPlan;
use listbench::{BenchConfig, Harness, InProcessLauncher, Mode, OutputUnit, ProcessLauncher, Registry, Suite};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "listbench", version, about = "Linked list vs. array list microbenchmarks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run benchmarks and print their statistics
    Run(RunArgs),
    /// List registered benchmarks
    List,
    /// Run one fork and report it as JSON on stdout
    #[command(hide = true)]
    ForkChild {
        #[arg(long)]
        plan: String,
        #[arg(long, default_value = "info")]
        log_level: String,
        #[arg(long)]
        log_json: bool,
    },
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Start from a suite's preset and run its cases
    #[arg(long)]
    suite: Option<String>,
    /// Benchmark or suite to include (repeatable)
    #[arg(long = "bench", value_name = "NAME")]
    benches: Vec<String>,
    /// Processes per benchmark; 0 runs in this process
    #[arg(long)]
    forks: Option<u32>,
    #[arg(long)]
    warmup: Option<u32>,
    #[arg(long)]
    measurement: Option<u32>,
    #[arg(long)]
    iteration_time_ms: Option<u64>,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(long, value_enum)]
    unit: Option<UnitArg>,
    /// Upper bound of the shared boxed integer cache
    #[arg(long)]
    box_cache_max: Option<i32>,
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
    #[arg(long)]
    log_level: Option<String>,
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    #[value(name = "thrpt")]
    Throughput,
    #[value(name = "avgt")]
    AverageTime,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitArg {
    S,
    Ms,
    Us,
    Ns,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Throughput => Mode::Throughput,
            ModeArg::AverageTime => Mode::AverageTime,
        }
    }
}

impl From<UnitArg> for OutputUnit {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::S => OutputUnit::Seconds,
            UnitArg::Ms => OutputUnit::Milliseconds,
            UnitArg::Us => OutputUnit::Microseconds,
            UnitArg::Ns => OutputUnit::Nanoseconds,
        }
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run(args) => run(args),
        Command::List => {
            list();
            Ok(ExitCode::SUCCESS)
        }
        Command::ForkChild { plan, log_level, log_json } => {
            init_logging(&LoggingConfig { level: log_level, json_output: log_json });
            fork_child(&plan)
        }
    };

    result.unwrap_or_else(|e| {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    })
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    let result = if logging.json_output {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    // An already installed subscriber stays in charge and receives this line.
    if let Err(e) = result {
        debug!("Logging already initialized: {}", e);
    }
}

/// Base config: file from `LISTBENCH_CONFIG`, else the suite preset, else defaults
fn load_config(args: &RunArgs) -> anyhow::Result<BenchConfig> {
    let suite = match &args.suite {
        Some(name) => Some(Suite::from_name(name).with_context(|| format!("unknown suite `{}`", name))?),
        None => None,
    };

    let mut config = match BenchConfig::from_env()? {
        Some(config) => config,
        None => suite.map(|s| s.preset()).unwrap_or_default(),
    };

    if let Some(suite) = suite {
        if !config.include.iter().any(|n| n == suite.name()) {
            config.include.push(suite.name().to_string());
        }
    }
    config.include.extend(args.benches.iter().cloned());
    if let Some(forks) = args.forks {
        config.forks = forks;
    }
    if let Some(warmup) = args.warmup {
        config.warmup_iterations = warmup;
    }
    if let Some(measurement) = args.measurement {
        config.measurement_iterations = measurement;
    }
    if let Some(ms) = args.iteration_time_ms {
        config.iteration_time_ms = ms;
    }
    if let Some(mode) = args.mode {
        config.mode = Some(mode.into());
    }
    if let Some(unit) = args.unit {
        config.output_unit = Some(unit.into());
    }
    if let Some(max) = args.box_cache_max {
        config.runtime.box_cache_max = max;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = level.clone();
    }
    if args.log_json {
        config.logging.json_output = true;
    }
    Ok(config)
}

fn run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let config = load_config(&args)?;
    init_logging(&config.logging);

    let report = if config.forks == 0 {
        info!("Forking disabled, running in-process");
        Harness::new(Registry::builtin(), InProcessLauncher).run(&config)?
    } else {
        let launcher = ProcessLauncher::current_exe(config.logging.clone())
            .context("cannot locate the listbench executable for forking")?;
        Harness::new(Registry::builtin(), launcher).run(&config)?
    };

    match args.format {
        Format::Table => print!("{}", report),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !report.is_complete() {
        error!("Some forks did not complete");
    }
    Ok(ExitCode::from(report.exit_status()))
}

fn list() {
    for case in Registry::builtin().cases() {
        let modes: Vec<&str> = case.modes.iter().map(|m| m.short_name()).collect();
        println!("{:<26} {:<9} {:<11} {}", case.name, case.suite, modes.join(","), case.unit);
    }
}

fn fork_child(plan_json: &str) -> anyhow::Result<ExitCode> {
    let plan: ForkPlan = serde_json::from_str(plan_json).context("invalid fork plan")?;
    let outcome = run_child(&Registry::builtin(), &plan);

    println!("{}", serde_json::to_string(&outcome)?);

    Ok(if outcome.is_completed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
