use crate::{
    driver::{Driver, DriverError},
    utils::{OVERFLOW_LABEL, PAGE_LINKS_XPATH},
};

/// Which pager link to follow after a page has been captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextPage {
    /// The wanted page number is visible at this link index.
    Number(usize),
    /// The wanted page is hidden behind the trailing overflow link at this index.
    Overflow(usize),
    Done,
}

impl NextPage {
    pub fn link_index(&self) -> Option<usize> {
        match self {
            NextPage::Number(i) | NextPage::Overflow(i) => Some(*i),
            NextPage::Done => None,
        }
    }
}

/// Labels of the numbered pager links currently on screen.
///
/// The grid renders its pager above and below the table, so the xpath matches
/// every link twice; only the first half belongs to one pager.
pub fn visible_page_labels<D: Driver + ?Sized>(driver: &D) -> Result<Vec<String>, DriverError> {
    let mut labels = driver.texts_by_xpath(PAGE_LINKS_XPATH)?;
    labels.truncate(labels.len() / 2);
    Ok(labels)
}

pub fn next_page_link(labels: &[String], next_page: usize) -> NextPage {
    let wanted = next_page.to_string();
    if let Some(i) = labels.iter().position(|l| l.trim() == wanted) {
        return NextPage::Number(i);
    }
    // a leading overflow link only leads back to pages already captured
    match labels.last() {
        Some(last) if last.trim() == OVERFLOW_LABEL => NextPage::Overflow(labels.len() - 1),
        _ => NextPage::Done,
    }
}
