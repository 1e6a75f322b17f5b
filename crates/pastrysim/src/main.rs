//! pastrysim - measure Pastry hop counts against log_{2^b}(N)

use anyhow::Result;
use clap::{Parser, ValueEnum};
use pastry_routing::ZeroEncoding;
use pastrysim::{report, Config, Experiment};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pastrysim")]
#[command(about = "Simulate Pastry routing and compare hop counts with log_{2^b}(N)")]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "PASTRYSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Write a default configuration file and exit
    #[arg(long)]
    init: bool,

    /// Smallest node count
    #[arg(long)]
    lower: Option<usize>,

    /// Largest node count
    #[arg(long)]
    upper: Option<usize>,

    /// Node count increment
    #[arg(long)]
    step: Option<usize>,

    /// Batches per node count, and messages per batch
    #[arg(short, long)]
    trials: Option<usize>,

    /// RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Radix exponents to simulate (repeatable)
    #[arg(short = 'b', long = "b")]
    radix_exponents: Vec<u32>,

    /// How key 0 is written
    #[arg(long, value_enum)]
    zero_encoding: Option<ZeroEncodingArg>,

    /// Also write the results as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ZeroEncodingArg {
    Empty,
    Digit,
}

impl From<ZeroEncodingArg> for ZeroEncoding {
    fn from(arg: ZeroEncodingArg) -> Self {
        match arg {
            ZeroEncodingArg::Empty => ZeroEncoding::Empty,
            ZeroEncodingArg::Digit => ZeroEncoding::Digit,
        }
    }
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(lower) = self.lower {
            config.nodes.lower = lower;
        }
        if let Some(upper) = self.upper {
            config.nodes.upper = upper;
        }
        if let Some(step) = self.step {
            config.nodes.step = step;
        }
        if let Some(trials) = self.trials {
            config.trials = trials;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if !self.radix_exponents.is_empty() {
            config.radix_exponents = self.radix_exponents.clone();
        }
        if let Some(zero) = self.zero_encoding {
            config.zero_encoding = zero.into();
        }
    }
}

fn init_logging(level: &str, debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.init {
        let path = args.config.clone().unwrap_or_else(Config::default_config_path);
        Config::create_default(Some(path.clone()))?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);
    config.validate()?;

    init_logging(&config.logging.level, args.debug);
    info!(
        lower = config.nodes.lower,
        upper = config.nodes.upper,
        step = config.nodes.step,
        trials = config.trials,
        seed = config.seed,
        "starting experiment"
    );

    let mut experiment = Experiment::new(config)?;
    let report = experiment.run()?;

    print!("{}", report::render_text(&report));

    if let Some(path) = &args.json {
        report::write_json(&report, path)?;
        info!("JSON report written to {}", path.display());
    }

    Ok(())
}
