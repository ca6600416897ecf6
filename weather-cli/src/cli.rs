use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use inquire::{CustomType, Text};
use weather_core::{
    Config, DemoOutput, DemoPlan, SimulatedService, WeatherReport, fixture, run_demo,
    runner::TaskOutcome,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Simulated weather report exchange")]
pub struct Cli {
    /// Defaults to `run` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch one city's report and submit a new one, concurrently.
    Run(RunArgs),

    /// Interactively edit and save the simulation settings.
    Configure,

    /// List the cities served by the simulated remote.
    Cities,
}

/// One-off overrides for the stored configuration.
#[derive(Debug, Default, Args)]
pub struct RunArgs {
    /// City to fetch.
    #[arg(long)]
    pub city: Option<String>,

    /// Chance that each simulated call fails, 0.0 to 1.0.
    #[arg(long)]
    pub failure_probability: Option<f64>,

    #[arg(long)]
    pub fetch_delay_ms: Option<u64>,

    #[arg(long)]
    pub submit_delay_ms: Option<u64>,
}

impl RunArgs {
    fn apply(self, mut config: Config) -> Config {
        if let Some(city) = self.city {
            config.fetch_city = city;
        }
        if let Some(p) = self.failure_probability {
            config.failure_probability = p;
        }
        if let Some(ms) = self.fetch_delay_ms {
            config.fetch_delay_ms = ms;
        }
        if let Some(ms) = self.submit_delay_ms {
            config.submit_delay_ms = ms;
        }
        config
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run(RunArgs::default())) {
            Command::Run(args) => run(args).await,
            Command::Configure => configure(),
            Command::Cities => cities(),
        }
    }
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = args.apply(Config::load_or_default()?);
    config.validate()?;

    let service = Arc::new(SimulatedService::from_config(&config));
    let plan = DemoPlan::from(&config);

    println!("Getting weather report for {}...", plan.fetch_city);
    println!("Updating weather report for {}...", plan.submit.city);

    match run_demo(service, &plan).await {
        Ok(summary) => {
            print_outcomes(&summary.outcomes);
            println!(
                "Finished {} task(s) in {:.1}s ({} - {})",
                summary.outcomes.len(),
                summary.elapsed.as_secs_f64(),
                summary.started_at.with_timezone(&Local).format("%H:%M:%S"),
                summary.finished_at.with_timezone(&Local).format("%H:%M:%S"),
            );
            Ok(())
        }
        Err(err) => {
            print_outcomes(&err.succeeded);
            Err(err.into())
        }
    }
}

fn print_outcomes(outcomes: &[TaskOutcome<DemoOutput>]) {
    for outcome in outcomes {
        match &outcome.value {
            DemoOutput::Fetched(report) => {
                println!("Done getting report!");
                print_report(report);
            }
            DemoOutput::Submitted => println!("Done updating report!"),
        }
    }
}

fn print_report(report: &WeatherReport) {
    println!("City:\t\t{}", report.city);
    println!("Temperature:\t{:.1}", report.temperature);
    println!("Condition:\t{}", report.condition);
}

fn configure() -> anyhow::Result<()> {
    let current = Config::load()?;

    let fetch_city = Text::new("City to fetch:").with_default(&current.fetch_city).prompt()?;

    let submit_city = Text::new("City to submit a report for:")
        .with_default(&current.submit.city)
        .prompt()?;
    let submit_temperature = CustomType::<f64>::new("Reported temperature (°C):")
        .with_default(current.submit.temperature)
        .prompt()?;
    let submit_condition = Text::new("Reported condition:")
        .with_default(&current.submit.condition)
        .prompt()?;

    let failure_probability = CustomType::<f64>::new("Failure probability (0.0 - 1.0):")
        .with_default(current.failure_probability)
        .prompt()?;
    let fetch_delay_ms = CustomType::<u64>::new("Fetch latency (ms):")
        .with_default(current.fetch_delay_ms)
        .prompt()?;
    let submit_delay_ms = CustomType::<u64>::new("Submit latency (ms):")
        .with_default(current.submit_delay_ms)
        .prompt()?;

    let config = Config {
        fetch_delay_ms,
        submit_delay_ms,
        failure_probability,
        fetch_city,
        submit: WeatherReport::new(submit_city, submit_temperature, submit_condition),
    };
    config.validate()?;

    let path = config.save().context("Failed to save configuration")?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn cities() -> anyhow::Result<()> {
    for report in fixture::fixture_reports()? {
        println!("{:<14}{:>6.1}  {}", report.city, report.temperature, report.condition);
    }
    Ok(())
}
