use std::time::Duration;

use url::Url;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const DEFAULT_MAX_POLLS: u32 = 100;
pub const DEFAULT_OUTPUT_DIR: &str = "data";

// element ids and paths of the Legistar calendar page
pub const CALENDAR_TABLE_ID: &str = "ctl00_ContentPlaceHolder1_gridCalendar_ctl00";
pub const FIRST_ROW_ID: &str = "ctl00_ContentPlaceHolder1_gridCalendar_ctl00__0";
pub const SEARCH_BUTTON_ID: &str = "ctl00_ContentPlaceHolder1_btnSearch";
pub const PAGE_LINKS_XPATH: &str = "//td[@class='rgPagerCell NumericPages']/div[1]/a";
pub const PAGER_HEADER: &str = "Data pager";
pub const OVERFLOW_LABEL: &str = "...";

/// Root of the site hosting `scrape_url`, e.g. `https://sanjose.legistar.com/`.
pub fn site_root(scrape_url: &str) -> Result<Url, url::ParseError> {
    let mut root = Url::parse(scrape_url)?;
    root.set_path("/");
    root.set_query(None);
    root.set_fragment(None);
    Ok(root)
}

/// Resolves a table link against the site root. Absolute links are kept as-is.
pub fn resolve_link(root: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    root.join(href).ok().map(String::from)
}

/// File-name friendly form of a city name ("San Jose" -> "san-jose").
pub fn city_slug(city_name: &str) -> String {
    city_name.to_lowercase().replace(' ', "-")
}
