use anyhow::{anyhow, Context, Result};
use headless_chrome::browser::tab::{element::Element, NoElementFound};
use headless_chrome::Tab;
use headless_chrome::{browser::default_executable, Browser, LaunchOptions};
use std::sync::Arc;
use std::time::Duration;
use sysinfo::{Pid, PidExt, ProcessExt, System, SystemExt};

use crate::driver::{Driver, DriverError};

/// Maps a headless_chrome failure onto the driver error kinds the scraper
/// tells apart.
fn classify(locator: &str, e: anyhow::Error) -> DriverError {
    if e.downcast_ref::<NoElementFound>().is_some() {
        return DriverError::NoSuchElement(locator.to_string());
    }
    let message = e.to_string();
    // nodes removed by a re-render are reported by the devtools protocol
    if message.contains("node with given id") || message.contains("Node is detached") {
        return DriverError::StaleElement(locator.to_string());
    }
    DriverError::Browser(format!("{}: {}", locator, message))
}

/// One Chrome process with a single tab, killed when dropped.
pub struct BrowserController {
    browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserController {
    pub fn new(headless: bool, timeout: u64) -> Result<Self> {
        let is_docker = std::env::var("IN_DOCKER").is_ok();
        let path = default_executable().map_err(|e| anyhow!(e))?;
        let options = LaunchOptions::default_builder()
            .path(Some(path))
            .headless(headless)
            .window_size(Some((1920, 1080)))
            .idle_browser_timeout(Duration::from_secs(timeout))
            // warning only do this if in docker env
            .sandbox(!is_docker)
            .build()
            .map_err(|e| anyhow!("invalid browser launch options: {}", e))?;
        let browser = Browser::new(options).context("browser launching error")?;
        let tab = browser.new_tab().context("could not create new tab")?;

        Ok(BrowserController { browser, tab })
    }

    fn element_by_id(&self, id: &str) -> Result<Element<'_>, DriverError> {
        self.tab
            .find_element(&format!("#{}", id))
            .map_err(|e| classify(id, e))
    }

    fn elements_by_xpath(&self, xpath: &str) -> Result<Vec<Element<'_>>, DriverError> {
        match self.tab.find_elements_by_xpath(xpath) {
            Ok(elements) => Ok(elements),
            Err(e) => match classify(xpath, e) {
                DriverError::NoSuchElement(_) => Ok(vec![]),
                other => Err(other),
            },
        }
    }

    fn click(&self, locator: &str, element: &Element<'_>) -> Result<(), DriverError> {
        element
            .scroll_into_view()
            .and_then(|el| el.click())
            .map(|_| ())
            .map_err(|e| classify(locator, e))
    }

    pub fn kill(&self) -> bool {
        let pid = match self.browser.get_process_id() {
            Some(pid) => pid,
            None => return false,
        };
        let mut s = System::new();
        s.refresh_processes();
        if let Some(process) = s.process(Pid::from_u32(pid)) {
            debug!("killing process with id {}", pid);
            process.kill();
            return true;
        }
        false
    }
}

impl Driver for BrowserController {
    fn navigate(&self, url: &str) -> Result<(), DriverError> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| classify(url, e))
    }

    fn text_by_id(&self, id: &str) -> Result<String, DriverError> {
        let text = self
            .element_by_id(id)?
            .get_inner_text()
            .map_err(|e| classify(id, e))?;
        Ok(text.trim().to_string())
    }

    fn texts_by_xpath(&self, xpath: &str) -> Result<Vec<String>, DriverError> {
        self.elements_by_xpath(xpath)?
            .iter()
            .map(|el| {
                el.get_inner_text()
                    .map(|t| t.trim().to_string())
                    .map_err(|e| classify(xpath, e))
            })
            .collect()
    }

    fn click_by_id(&self, id: &str) -> Result<(), DriverError> {
        let element = self.element_by_id(id)?;
        self.click(id, &element)
    }

    fn click_by_xpath(&self, xpath: &str, index: usize) -> Result<(), DriverError> {
        let elements = self.elements_by_xpath(xpath)?;
        let element = elements
            .get(index)
            .ok_or_else(|| DriverError::NoSuchElement(format!("{}[{}]", xpath, index)))?;
        self.click(xpath, element)
    }

    fn page_source(&self) -> Result<String, DriverError> {
        self.tab.get_content().map_err(|e| classify("page", e))
    }
}

impl Drop for BrowserController {
    fn drop(&mut self) {
        debug!("killing browser process...");
        self.kill();
    }
}
