use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::Context;
use signal_hook::consts::{SIGINT, SIGTERM};

use crate::{
    browser_controller::BrowserController,
    driver::Driver,
    filters::Filters,
    legistar::{LegistarScraper, ScraperOptions},
    types::{CityTarget, ScrapeOutput},
    utils::{DEFAULT_MAX_POLLS, DEFAULT_OUTPUT_DIR, DEFAULT_POLL_INTERVAL},
};

#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct RunnerOptions {
    // directory where the per-city csv files are written
    #[builder(default = "self.default_output_dir()")]
    output_dir: PathBuf,
    // dropdown selections applied to every city
    #[builder(default)]
    filters: Filters,
    // run chrome without a window
    #[builder(default = "true")]
    headless: bool,
    // browser timeout in seconds
    #[builder(default = "45")]
    browser_timeout: u64,
    #[builder(default = "DEFAULT_POLL_INTERVAL")]
    poll_interval: Duration,
    #[builder(default = "DEFAULT_MAX_POLLS")]
    max_polls: u32,
}

impl RunnerOptions {
    pub fn default_builder() -> RunnerOptionsBuilder {
        RunnerOptionsBuilder::default()
    }

    pub fn scraper_options(&self) -> anyhow::Result<ScraperOptions> {
        ScraperOptions::default_builder()
            .poll_interval(self.poll_interval)
            .max_polls(self.max_polls)
            .build()
            .context("invalid scraper options")
    }
}

impl RunnerOptionsBuilder {
    fn default_output_dir(&self) -> PathBuf {
        PathBuf::from(DEFAULT_OUTPUT_DIR)
    }
}

/// Outcome of one city of a batch.
#[derive(Debug)]
pub struct CityReport {
    pub city: CityTarget,
    pub result: anyhow::Result<ScrapeOutput>,
}

pub struct Runner {
    options: RunnerOptions,
    should_terminate: Arc<AtomicBool>,
}

impl Runner {
    pub fn new(options: RunnerOptions) -> anyhow::Result<Self> {
        let should_terminate = Arc::new(AtomicBool::new(false));
        signal_hook::flag::register(SIGTERM, Arc::clone(&should_terminate))?;
        signal_hook::flag::register(SIGINT, Arc::clone(&should_terminate))?;

        Ok(Runner {
            options,
            should_terminate,
        })
    }

    /// Flag raised by SIGINT/SIGTERM; once set no further city is started.
    pub fn terminate_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.should_terminate)
    }

    /// Scrapes every city with its own headless Chrome.
    pub fn run_all(&self, cities: &[CityTarget]) -> Vec<CityReport> {
        let headless = self.options.headless;
        let timeout = self.options.browser_timeout;
        self.run_all_with(cities, || BrowserController::new(headless, timeout))
    }

    /// Scrapes every city in order with a fresh driver from `launch`.
    ///
    /// A failing city is logged and reported; the batch moves on to the next
    /// one. Termination signals are honoured between cities.
    pub fn run_all_with<D, F>(&self, cities: &[CityTarget], mut launch: F) -> Vec<CityReport>
    where
        D: Driver,
        F: FnMut() -> anyhow::Result<D>,
    {
        let mut reports = vec![];
        for city in cities {
            if self.should_terminate.load(Ordering::Relaxed) {
                warn!("termination requested, skipping remaining cities");
                break;
            }
            info!("scraping city {} at {}", city.city_name, city.scrape_url);

            let result = self.scrape_city(city, &mut launch);
            match &result {
                Ok(output) => info!(
                    "{}: {} documents{}",
                    city.city_name,
                    output.documents.len(),
                    output
                        .path
                        .as_ref()
                        .map(|p| format!(" written to {:?}", p))
                        .unwrap_or_default()
                ),
                Err(e) => error!(
                    "could not scrape city {} ({}): {:#}",
                    city.city_name, city.scrape_url, e
                ),
            }
            reports.push(CityReport {
                city: city.clone(),
                result,
            });
        }
        reports
    }

    /// Launches a driver, scrapes one city and drops the driver on every path.
    pub fn scrape_city<D, F>(&self, city: &CityTarget, launch: F) -> anyhow::Result<ScrapeOutput>
    where
        D: Driver,
        F: FnOnce() -> anyhow::Result<D>,
    {
        let driver = launch().context("could not launch browser")?;
        let scraper = LegistarScraper::new(
            &city.city_name,
            &city.scrape_url,
            &driver,
            self.options.scraper_options()?,
        )?;
        scraper.extract_all_table_data(Some(&self.options.output_dir), &self.options.filters)
    }
}
