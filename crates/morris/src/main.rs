use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use morris::{ReportFormat, ScreeningData, ScreeningReport, init_logging};
use morris_core::screening::seeded_rng;
use morris_core::{ScreeningConfig, ScreeningProgress, sample, screen};

#[derive(Parser, Debug)]
#[command(name = "morris")]
#[command(about = "Morris one-at-a-time global sensitivity screening")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Screen the benchmark oracle named in the config file
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Write the report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,
    },
    /// Print the selected design points as CSV without evaluating them
    Sample {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Path to the YAML screening file
    #[arg(short, long)]
    config: PathBuf,

    /// Override the seed from the file
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of trajectories kept from the file
    #[arg(long)]
    trajectories: Option<usize>,
}

impl InputArgs {
    /// Load the screening file and apply command-line overrides.
    ///
    /// The seed is always resolved here so the report can record it.
    fn load(&self) -> Result<ScreeningData> {
        let yaml = std::fs::read_to_string(&self.config)
            .wrap_err_with(|| format!("Failed to read {}", self.config.display()))?;
        let mut data = ScreeningData::from_yaml(&yaml)
            .wrap_err_with(|| format!("Failed to parse {}", self.config.display()))?;

        if let Some(seed) = self.seed {
            data.screening.seed = Some(seed);
        }
        if let Some(n) = self.trajectories {
            data.screening.num_trajectory = n;
        }
        if data.screening.seed.is_none() {
            let seed = rand::random::<u64>();
            tracing::info!(seed, "No seed given, drew one");
            data.screening.seed = Some(seed);
        }
        Ok(data)
    }
}

fn run(input: &InputArgs, output: Option<&Path>, format: ReportFormat) -> Result<()> {
    let data = input.load()?;
    let space = morris::to_parameter_space(&data.parameters)?;
    let mut oracle = data.oracle.clone();
    oracle.check_dimension(space.len())?;

    let config: ScreeningConfig = data.screening.clone();
    let progress = ScreeningProgress::new(config.max_oracle_calls());
    let result =
        screen(&space, &config, &mut oracle, Some(&progress)).wrap_err("Screening failed")?;
    tracing::debug!(
        completed = progress.completed(),
        planned = config.max_oracle_calls(),
        "Oracle calls finished"
    );

    let report = ScreeningReport::new(oracle.name(), config, &result);
    print!("{}", report.format_table());

    if let Some(path) = output {
        report.write(path, format)?;
    }
    Ok(())
}

fn sample_design(input: &InputArgs) -> Result<()> {
    let data = input.load()?;
    let space = morris::to_parameter_space(&data.parameters)?;
    let mut rng = seeded_rng(data.screening.seed);
    let design = sample(&space, &data.screening, &mut rng)?;

    let names: Vec<&str> = space.parameters().iter().map(|p| p.name.as_str()).collect();
    println!("trajectory,{}", names.join(","));
    for (t, block) in design.distinct_blocks().iter().enumerate() {
        for point in block.points() {
            let row: Vec<String> = point.iter().map(f64::to_string).collect();
            println!("{t},{}", row.join(","));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), &cli.log_level)?;

    match &cli.command {
        Command::Run {
            input,
            output,
            format,
        } => run(input, output.as_deref(), *format),
        Command::Sample { input } => sample_design(input),
    }
}
