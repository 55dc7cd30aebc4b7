use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{
    types::ScrapeError,
    utils::{resolve_link, PAGER_HEADER},
};

lazy_static! {
    static ref TH: Selector = Selector::parse("th").unwrap();
    static ref TR: Selector = Selector::parse("tr").unwrap();
    static ref TD: Selector = Selector::parse("td").unwrap();
    static ref ANCHOR: Selector = Selector::parse("a").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub url: Option<String>,
}

/// One grid row keyed by column header, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    cells: Vec<(String, Cell)>,
}

impl TableRow {
    pub fn new(headers: &[String], cells: Vec<Cell>) -> Self {
        TableRow {
            cells: headers.iter().cloned().zip(cells).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, header: &str) -> Option<&Cell> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, cell)| cell)
    }

    pub fn text(&self, header: &str) -> Option<&str> {
        self.cell(header).map(|c| c.text.as_str())
    }

    pub fn url(&self, header: &str) -> Option<&str> {
        self.cell(header).and_then(|c| c.url.as_deref())
    }

    pub fn cells(&self) -> impl Iterator<Item = (&str, &Cell)> {
        self.cells.iter().map(|(h, c)| (h.as_str(), c))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

/// Text of an element with every text node trimmed and blank nodes dropped.
fn stripped_text(el: ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn first_link(td: ElementRef, root: &Url) -> Option<String> {
    td.select(&ANCHOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .and_then(|href| resolve_link(root, href))
}

/// Parses the grid with id `table_id` out of a captured page.
///
/// A row is kept once it has one cell per header; rows with fewer cells
/// (spacers, the pager row, "no records" rows) are dropped and cells past the
/// header count are ignored.
pub fn extract_table(markup: &str, table_id: &str, root: &Url) -> Result<Table, ScrapeError> {
    let document = Html::parse_document(markup);
    let table_selector = Selector::parse(&format!("#{}", table_id))
        .map_err(|_| ScrapeError::structure_missing(format!("invalid table id {}", table_id)))?;
    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| ScrapeError::structure_missing(format!("table #{}", table_id)))?;

    let headers: Vec<String> = table
        .select(&TH)
        .map(stripped_text)
        .filter(|h| h != PAGER_HEADER)
        .collect();
    let num_cols = headers.len();

    let mut rows = vec![];
    if num_cols == 0 {
        return Ok(Table { headers, rows });
    }

    for tr in table.select(&TR) {
        let mut cells = Vec::with_capacity(num_cols);
        for td in tr.select(&TD) {
            cells.push(Cell {
                text: stripped_text(td),
                url: first_link(td, root),
            });
            if cells.len() == num_cols {
                rows.push(TableRow::new(&headers, cells));
                break;
            }
        }
    }

    Ok(Table { headers, rows })
}
