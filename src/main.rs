use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use chrono::{Datelike, Utc};
use clap::Parser;
use env_logger::Env;
use legistar_scraper::{
    filters::{FilterField, Filters},
    runner::{Runner, RunnerOptions},
    utils::DEFAULT_OUTPUT_DIR,
    writer::read_cities_file,
};
use log::{debug, info};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Legistar meeting document scraper", long_about = None)]
struct Args {
    /// Directory where the per-city document lists are written
    #[arg(short = 'o', long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
    /// CSV of `city name,calendar url` pairs, without a header row
    #[arg(short = 'i', long, default_value = "cities.csv")]
    input: PathBuf,
    /// Year to select in the calendar (defaults to the current year)
    #[arg(short = 'y', long)]
    year: Option<String>,
    /// Body to select in the calendar (defaults to the first option)
    #[arg(short = 'b', long)]
    bodies: Option<String>,
    /// Show the browser window
    #[arg(long, default_value_t = false)]
    headful: bool,
    /// Milliseconds between two looks at the rendered page
    #[arg(long, default_value_t = 100)]
    poll_interval_ms: u64,
    /// Looks at the rendered page before a page transition is given up
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    max_polls: u32,
    /// Maximum time in seconds the browser may sit idle
    #[arg(long, default_value_t = 45)]
    browser_timeout: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    debug!("starting with {:#?}", args);

    let year = args
        .year
        .clone()
        .unwrap_or_else(|| Utc::now().year().to_string());
    let mut filters = Filters::new().with(FilterField::Years, year);
    if let Some(bodies) = args.bodies.clone() {
        filters = filters.with(FilterField::Bodies, bodies);
    }

    let cities = read_cities_file(&args.input)?;
    info!("{} cities to scrape from {:?}", cities.len(), args.input);

    let options = RunnerOptions::default_builder()
        .output_dir(args.output_dir)
        .filters(filters)
        .headless(!args.headful)
        .browser_timeout(args.browser_timeout)
        .poll_interval(Duration::from_millis(args.poll_interval_ms))
        .max_polls(args.max_polls)
        .build()
        .context("invalid runner options")?;

    let runner = Runner::new(options)?;
    let reports = runner.run_all(&cities);

    let failed = reports.iter().filter(|r| r.result.is_err()).count();
    info!(
        "scraped {} of {} cities, {} failed",
        reports.len() - failed,
        cities.len(),
        failed
    );
    Ok(())
}
