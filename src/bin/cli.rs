use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use team_forecast::{
    PlanningFormat, check_planning, forecast_completion, load_planning, save_planning,
};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "planner",
    about = "Forecast when a prioritized task list will be delivered"
)]
struct Cli {
    /// Planning document (YAML, or JSON with a .json extension)
    input: PathBuf,

    /// File to write the forecast planning to
    #[arg(short, long, required_unless_present = "check_only")]
    out: Option<PathBuf>,

    /// Output format: yaml, json or csv
    #[arg(short, long, env = "PLANNER_FORMAT", default_value = "yaml")]
    format: PlanningFormat,

    /// Only check the planning for consistency, do not forecast
    #[arg(long)]
    check_only: bool,

    /// Skip re-checking the forecast before writing it
    #[arg(long)]
    no_verify: bool,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut planning = load_planning(&cli.input)
        .with_context(|| format!("error parsing planning {}", cli.input.display()))?;

    check_planning(&planning).context("inconsistent planning")?;
    if cli.check_only {
        println!("planning is consistent");
        return Ok(());
    }

    let summary = forecast_completion(&mut planning).context("forecast failed")?;
    if !cli.no_verify {
        check_planning(&planning).context("forecast output failed its consistency check")?;
    }

    if let Some(out) = &cli.out {
        save_planning(&planning, out, cli.format)
            .with_context(|| format!("error writing to file {}", out.display()))?;
        info!(path = %out.display(), format = cli.format.as_str(), "forecast written");
    }

    println!("{}", summary.to_cli_summary());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
