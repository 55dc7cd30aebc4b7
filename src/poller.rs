use std::{thread::sleep, time::Duration};

use crate::{
    driver::{Driver, DriverError},
    types::ScrapeError,
    utils::{DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL, FIRST_ROW_ID},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    TimedOut,
}

/// Fixed-interval, bounded polling of rendered page state.
///
/// The calendar grid is re-rendered by script after every postback, so there
/// is no load event to wait on. Instead the text of the first grid row is used
/// as a signature of the current page and compared across polls.
#[derive(Debug, Clone, Copy)]
pub struct Poller {
    interval: Duration,
    max_polls: u32,
}

impl Default for Poller {
    fn default() -> Self {
        Poller::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_POLLS)
    }
}

impl Poller {
    pub fn new(interval: Duration, max_polls: u32) -> Self {
        Poller {
            interval,
            max_polls,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_polls(&self) -> u32 {
        self.max_polls
    }

    pub fn page_signature<D: Driver + ?Sized>(&self, driver: &D) -> Result<String, DriverError> {
        Ok(driver.text_by_id(FIRST_ROW_ID)?.trim().to_string())
    }

    /// Waits until the page signature differs from `previous`.
    ///
    /// An empty signature means the grid is still being drawn. A stale or
    /// missing row means the old grid was torn down, which counts as loaded.
    pub fn wait_for_table_load<D: Driver + ?Sized>(
        &self,
        driver: &D,
        previous: &str,
    ) -> Result<LoadStatus, DriverError> {
        for poll in 1..=self.max_polls {
            sleep(self.interval);
            match self.page_signature(driver) {
                Ok(signature) => {
                    if !signature.is_empty() && signature != previous {
                        debug!("table loaded after {} polls", poll);
                        return Ok(LoadStatus::Loaded);
                    }
                }
                Err(e) if e.is_transient() => {
                    debug!("table re-rendering after {} polls ({})", poll, e);
                    return Ok(LoadStatus::Loaded);
                }
                Err(e) => return Err(e),
            }
        }
        warn!("table did not change after {} polls", self.max_polls);
        Ok(LoadStatus::TimedOut)
    }

    /// Waits until the first element matching `xpath` shows some text.
    pub fn wait_for_populated<D: Driver + ?Sized>(
        &self,
        driver: &D,
        xpath: &str,
    ) -> Result<(), ScrapeError> {
        for poll in 1..=self.max_polls {
            sleep(self.interval);
            let texts = match driver.texts_by_xpath(xpath) {
                Ok(texts) => texts,
                Err(e) if e.is_transient() => continue,
                Err(e) => return Err(e.into()),
            };
            if texts.first().map_or(false, |t| !t.trim().is_empty()) {
                debug!("{} populated after {} polls", xpath, poll);
                return Ok(());
            }
        }
        Err(ScrapeError::structure_missing(format!(
            "{} never populated after {} polls",
            xpath, self.max_polls
        )))
    }
}
