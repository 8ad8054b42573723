use std::fs;
use std::path::{Path, PathBuf};

use abcalc_stats::{
    achieved_power, calculate_sample_size, test_significance, ProportionSample, Tail,
};
use clap::{Args, Parser, Subcommand};
use log::debug;
use serde::Serialize;

mod config;
mod error;
mod render;

use config::{Config, Overrides, CONFIG_FILE};
use error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "abcalc",
    version,
    about = "A/B test calculator for two-proportion experiments",
    long_about = "abcalc sizes and analyses two-arm conversion experiments.\n\n\
        Commands:\n  \
        sum           Add two numbers\n  \
        sample-size   Minimum arm sizes for a target difference\n  \
        significance  Pooled z-test on observed counts\n  \
        power         Post-hoc power of observed counts\n  \
        init          Write an abcalc.toml with the built-in defaults\n  \
        check         Validate abcalc.toml and print the effective defaults"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Config file (defaults to ./abcalc.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add two numbers
    Sum(SumArgs),
    /// Minimum treatment/control sizes to detect a difference
    SampleSize(SampleSizeArgs),
    /// Two-proportion z-test on observed counts
    Significance(CountsArgs),
    /// Power achieved by observed counts
    Power(CountsArgs),
    /// Write a config file with the built-in defaults
    Init,
    /// Validate the config file without computing anything
    Check,
}

#[derive(Debug, Args)]
struct SumArgs {
    #[arg(allow_negative_numbers = true)]
    x: f64,
    #[arg(allow_negative_numbers = true)]
    y: f64,
}

#[derive(Debug, Args)]
struct TestArgs {
    /// Significance level
    #[arg(long)]
    alpha: Option<f64>,

    /// two-sided, greater or less
    #[arg(long)]
    tail: Option<Tail>,
}

#[derive(Debug, Args)]
struct SampleSizeArgs {
    /// Control (baseline) conversion rate
    #[arg(long)]
    baseline: f64,

    /// Absolute minimum detectable effect, added to the baseline
    #[arg(long, allow_negative_numbers = true, conflicts_with = "target")]
    mde: Option<f64>,

    /// Expected treatment conversion rate
    #[arg(long)]
    target: Option<f64>,

    /// Target power
    #[arg(long)]
    power: Option<f64>,

    /// Control size / treatment size
    #[arg(long)]
    ratio: Option<f64>,

    #[command(flatten)]
    test: TestArgs,
}

#[derive(Debug, Args)]
struct CountsArgs {
    #[arg(long)]
    treatment_successes: u64,
    #[arg(long)]
    treatment_trials: u64,
    #[arg(long)]
    control_successes: u64,
    #[arg(long)]
    control_trials: u64,

    #[command(flatten)]
    test: TestArgs,
}

impl CountsArgs {
    fn samples(&self) -> Result<(ProportionSample, ProportionSample), CliError> {
        let treatment = ProportionSample::new(self.treatment_successes, self.treatment_trials)?;
        let control = ProportionSample::new(self.control_successes, self.control_trials)?;
        Ok((treatment, control))
    }

    fn overrides(&self) -> Overrides {
        Overrides {
            alpha: self.test.alpha,
            tail: self.test.tail,
            ..Overrides::default()
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = Context {
        quiet: cli.quiet,
        json: cli.json,
    };
    let rc = match run(&ctx, &cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("error: {e}");
            e.exit_code()
        }
    };
    std::process::exit(rc);
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

struct Context {
    quiet: bool,
    json: bool,
}

impl Context {
    fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    fn success(&self, msg: &str) {
        if !self.quiet {
            println!("✓ {msg}");
        }
    }

    /// Print either the text rendering or the JSON form of `value`.
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce() -> String) -> Result<(), CliError> {
        if self.quiet {
            return Ok(());
        }
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }
}

fn run(ctx: &Context, cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Sum(args) => run_sum(ctx, args),
        Command::SampleSize(args) => run_sample_size(ctx, cli.config.as_deref(), args),
        Command::Significance(args) => run_significance(ctx, cli.config.as_deref(), args),
        Command::Power(args) => run_power(ctx, cli.config.as_deref(), args),
        Command::Init => run_init(ctx, cli.config.as_deref()),
        Command::Check => run_check(ctx, cli.config.as_deref()),
    }
}

fn load(explicit: Option<&Path>) -> Result<Config, CliError> {
    let (config, path) = config::load_config(explicit)?;
    match path {
        Some(p) => debug!("loaded config from {}", p.display()),
        None => debug!("no {CONFIG_FILE}; using built-in defaults"),
    }
    Ok(config)
}

#[derive(Serialize)]
struct SumOutput {
    x: f64,
    y: f64,
    sum: f64,
}

fn run_sum(ctx: &Context, args: &SumArgs) -> Result<(), CliError> {
    let out = SumOutput {
        x: args.x,
        y: args.y,
        sum: args.x + args.y,
    };
    ctx.emit(&out, || render::sum(out.x, out.y, out.sum))
}

fn run_sample_size(
    ctx: &Context,
    config_path: Option<&Path>,
    args: &SampleSizeArgs,
) -> Result<(), CliError> {
    let params = load(config_path)?.parameters(&Overrides {
        alpha: args.test.alpha,
        power: args.power,
        ratio: args.ratio,
        tail: args.test.tail,
    })?;
    let res = calculate_sample_size(args.baseline, args.mde, args.target, &params)?;
    ctx.emit(&res, || render::sample_size(&res, &params))
}

fn run_significance(
    ctx: &Context,
    config_path: Option<&Path>,
    args: &CountsArgs,
) -> Result<(), CliError> {
    let params = load(config_path)?.analysis_parameters(&args.overrides())?;
    let (treatment, control) = args.samples()?;
    let res = test_significance(&treatment, &control, &params)?;
    ctx.emit(&res, || render::significance(&res, &params))
}

fn run_power(ctx: &Context, config_path: Option<&Path>, args: &CountsArgs) -> Result<(), CliError> {
    let params = load(config_path)?.analysis_parameters(&args.overrides())?;
    let (treatment, control) = args.samples()?;
    let res = achieved_power(&treatment, &control, &params)?;
    ctx.emit(&res, || render::power(&res, &params))
}

fn run_init(ctx: &Context, config_path: Option<&Path>) -> Result<(), CliError> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    if path.exists() {
        return Err(CliError::AlreadyExists(path));
    }
    fs::write(&path, config::generate_config()).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })?;
    ctx.success(&format!("Created {}", path.display()));
    Ok(())
}

fn run_check(ctx: &Context, config_path: Option<&Path>) -> Result<(), CliError> {
    let (config, path) = config::load_config(config_path)?;
    let params = config.parameters(&Overrides::default())?;
    match &path {
        Some(p) => ctx.success(&format!("Config valid: {}", p.display())),
        None => ctx.info(&format!("No {CONFIG_FILE} found; using built-in defaults")),
    }
    ctx.info(&format!(
        "alpha={} power={} ratio={} tail={}",
        params.alpha(),
        params.power(),
        params.ratio(),
        params.tail()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn mde_accepts_negative_values() {
        let cli = Cli::try_parse_from(["abcalc", "sample-size", "--baseline", "0.25", "--mde", "-0.01"])
            .unwrap();
        match cli.command {
            Command::SampleSize(args) => assert_eq!(args.mde, Some(-0.01)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn mde_and_target_are_mutually_exclusive() {
        let res = Cli::try_parse_from([
            "abcalc", "sample-size", "--baseline", "0.2", "--mde", "0.01", "--target", "0.21",
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn tail_flag_parses_aliases() {
        let cli = Cli::try_parse_from([
            "abcalc",
            "power",
            "--treatment-successes",
            "1",
            "--treatment-trials",
            "2",
            "--control-successes",
            "1",
            "--control-trials",
            "2",
            "--tail",
            "larger",
        ])
        .unwrap();
        match cli.command {
            Command::Power(args) => assert_eq!(args.test.tail, Some(Tail::Greater)),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
