use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriverError {
    #[error("no_such_element: {0}")]
    NoSuchElement(String),
    #[error("stale_element: {0}")]
    StaleElement(String),
    #[error("browser: {0}")]
    Browser(String),
}

impl DriverError {
    /// Lookup failures that happen while the page re-renders.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DriverError::NoSuchElement(_) | DriverError::StaleElement(_)
        )
    }
}

/// The subset of browser automation the scraper relies on.
///
/// Elements are addressed by locator on every call instead of being held as
/// handles, so an implementation never has to keep a node alive across a
/// re-render of the page.
pub trait Driver {
    fn navigate(&self, url: &str) -> Result<(), DriverError>;

    /// Trimmed inner text of the element with the given id.
    fn text_by_id(&self, id: &str) -> Result<String, DriverError>;

    /// Inner texts of every element matching `xpath`, in document order.
    /// An empty match is not an error.
    fn texts_by_xpath(&self, xpath: &str) -> Result<Vec<String>, DriverError>;

    /// Scrolls the element with the given id into view and clicks it.
    fn click_by_id(&self, id: &str) -> Result<(), DriverError>;

    /// Scrolls the `index`-th element matching `xpath` into view and clicks it.
    fn click_by_xpath(&self, xpath: &str, index: usize) -> Result<(), DriverError>;

    /// Markup of the page as currently rendered.
    fn page_source(&self) -> Result<String, DriverError>;
}
