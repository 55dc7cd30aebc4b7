use std::{path::Path, time::Duration};

use anyhow::Context;
use url::Url;

use crate::{
    documents::{self, DocumentRecord},
    driver::{Driver, DriverError},
    filters::{option_index, Filters, FilterField},
    paginator::{next_page_link, visible_page_labels, NextPage},
    poller::{LoadStatus, Poller},
    table::{extract_table, Table},
    types::{PageCapture, ScrapeError, ScrapeOutput},
    utils::{
        site_root, CALENDAR_TABLE_ID, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL,
        PAGE_LINKS_XPATH, SEARCH_BUTTON_ID,
    },
    writer::write_doc_list,
};

#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct ScraperOptions {
    // time between two looks at the rendered page
    #[builder(default = "DEFAULT_POLL_INTERVAL")]
    poll_interval: Duration,
    // looks at the rendered page before giving up on a transition
    #[builder(default = "DEFAULT_MAX_POLLS")]
    max_polls: u32,
    // id of the calendar grid
    #[builder(default = "self.default_table_id()")]
    table_id: String,
}

impl ScraperOptions {
    pub fn default_builder() -> ScraperOptionsBuilder {
        ScraperOptionsBuilder::default()
    }

    pub fn poller(&self) -> Poller {
        Poller::new(self.poll_interval, self.max_polls)
    }
}

impl ScraperOptionsBuilder {
    fn default_table_id(&self) -> String {
        CALENDAR_TABLE_ID.into()
    }
}

/// Lookup failures on elements every calendar page has mean the page is not
/// the grid we expect.
fn structural(what: &str) -> impl Fn(DriverError) -> ScrapeError + '_ {
    move |e| {
        if e.is_transient() {
            ScrapeError::structure_missing(format!("{} ({})", what, e))
        } else {
            ScrapeError::Driver(e)
        }
    }
}

/// Scrapes the meeting calendar of one Legistar site through a [`Driver`].
pub struct LegistarScraper<'d, D: Driver + ?Sized> {
    driver: &'d D,
    city_name: String,
    scrape_url: String,
    root: Url,
    options: ScraperOptions,
    poller: Poller,
}

impl<'d, D: Driver + ?Sized> LegistarScraper<'d, D> {
    /// Opens `scrape_url` in the driver.
    pub fn new(
        city_name: &str,
        scrape_url: &str,
        driver: &'d D,
        options: ScraperOptions,
    ) -> anyhow::Result<Self> {
        let root = site_root(scrape_url).context(format!("url passed is invalid {}", scrape_url))?;
        driver
            .navigate(scrape_url)
            .context(format!("could not navigate to {}", scrape_url))?;

        let poller = options.poller();
        Ok(LegistarScraper {
            driver,
            city_name: city_name.into(),
            scrape_url: scrape_url.into(),
            root,
            options,
            poller,
        })
    }

    /// Selects the requested value in each calendar dropdown and searches.
    pub fn apply_filters(&self, filters: &Filters) -> Result<(), ScrapeError> {
        for field in FilterField::ALL {
            let options_xpath = field.options_xpath();

            self.driver
                .click_by_id(field.input_id())
                .map_err(structural(field.input_id()))?;
            self.poller.wait_for_populated(self.driver, &options_xpath)?;

            let index = match filters.get(field) {
                Some(value) => {
                    let options = self.driver.texts_by_xpath(&options_xpath)?;
                    match option_index(&options, value) {
                        Some(i) => i,
                        None => {
                            warn!(
                                "unable to find {:?} in {} list {:?} for {}",
                                value, field, options, self.city_name
                            );
                            return Err(ScrapeError::FilterNotFound {
                                field: field.to_string(),
                                value: value.into(),
                            });
                        }
                    }
                }
                None => 0,
            };
            debug!("selecting option {} of {}", index, field);
            self.driver
                .click_by_xpath(&options_xpath, index)
                .map_err(structural(&options_xpath))?;

            self.driver
                .click_by_id(SEARCH_BUTTON_ID)
                .map_err(structural(SEARCH_BUTTON_ID))?;
        }
        Ok(())
    }

    /// Captures every results page, starting from the one on screen.
    ///
    /// Page `n + 1` is reached either through its own pager link or through
    /// the trailing overflow link that opens the next block of pages. A
    /// transition that never renders ends the traversal with the pages
    /// captured so far.
    pub fn paginate(&self) -> Result<Vec<PageCapture>, ScrapeError> {
        let mut pages = vec![];
        let mut page_number = 1;

        loop {
            info!("scraping page {} of {}", page_number, self.city_name);
            pages.push(PageCapture {
                number: page_number,
                markup: self.driver.page_source()?,
            });
            page_number += 1;

            let labels = visible_page_labels(self.driver).map_err(structural("pager"))?;
            let signature = self
                .poller
                .page_signature(self.driver)
                .map_err(structural("data table"))?;

            let next = next_page_link(&labels, page_number);
            let link = match next.link_index() {
                Some(link) => link,
                None => break,
            };
            if let NextPage::Overflow(_) = next {
                debug!("page {} is behind the overflow link", page_number);
            }
            self.driver
                .click_by_xpath(PAGE_LINKS_XPATH, link)
                .map_err(structural("pager link"))?;

            if self.poller.wait_for_table_load(self.driver, &signature)? == LoadStatus::TimedOut {
                warn!(
                    "page {} of {} never loaded, keeping {} pages",
                    page_number,
                    self.city_name,
                    pages.len()
                );
                break;
            }
        }

        Ok(pages)
    }

    pub fn scrape_all_pages(&self, filters: &Filters) -> Result<Vec<PageCapture>, ScrapeError> {
        self.apply_filters(filters)?;
        self.paginate()
    }

    pub fn extract_table_data(&self, page: &PageCapture) -> Result<Table, ScrapeError> {
        extract_table(&page.markup, &self.options.table_id, &self.root)
    }

    /// Pages, tables and documents for the given filters.
    pub fn scrape_documents(&self, filters: &Filters) -> Result<Vec<DocumentRecord>, ScrapeError> {
        let pages = self.scrape_all_pages(filters)?;
        info!("scraped {} pages of {}", pages.len(), self.city_name);

        let mut rows = vec![];
        for page in &pages {
            rows.extend(self.extract_table_data(page)?.rows);
        }
        info!("recovered {} meetings of {}", rows.len(), self.city_name);

        let docs = documents::extract_doc_list(&self.city_name, &rows)?;
        info!("recovered {} documents of {}", docs.len(), self.city_name);
        Ok(docs)
    }

    /// Scrapes the documents matching `filters` and, with a `save_dir`,
    /// writes them out.
    ///
    /// A missing filter value or an unexpected page layout ends this city
    /// with an empty output; other failures are returned.
    pub fn extract_all_table_data(
        &self,
        save_dir: Option<&Path>,
        filters: &Filters,
    ) -> anyhow::Result<ScrapeOutput> {
        let documents = match self.scrape_documents(filters) {
            Ok(docs) => docs,
            Err(e) if e.is_target_abort() => {
                warn!(
                    "aborting {} ({}): {}",
                    self.city_name, self.scrape_url, e
                );
                return Ok(ScrapeOutput::empty());
            }
            Err(e) => return Err(e).context(format!("could not scrape {}", self.city_name)),
        };

        let path = match save_dir {
            Some(dir) => Some(write_doc_list(dir, &self.city_name, &documents)?),
            None => None,
        };
        Ok(ScrapeOutput { documents, path })
    }
}
