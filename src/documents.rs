use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{table::TableRow, types::ScrapeError};

pub const DATE_COLUMN: &str = "Meeting Date";
pub const COMMITTEE_COLUMN: &str = "Name";
pub const DOC_FORMAT: &str = "pdf";

const LEGISTAR_DATE_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DocType {
    Agenda,
    Minutes,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::Agenda => "Agenda",
            DocType::Minutes => "Minutes",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grid columns that may link to a document, and the kind of document they hold.
pub const URL_COLUMNS: [(DocType, &str); 3] = [
    (DocType::Agenda, "Agenda"),
    (DocType::Minutes, "Minutes"),
    (DocType::Minutes, "Official Minutes"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentRecord {
    pub city: String,
    pub date: String,
    pub committee: String,
    pub doc_type: DocType,
    pub url: String,
    pub doc_format: String,
}

/// ISO form of a Legistar meeting date, or the text unchanged if it is not one.
pub fn normalize_date(text: &str) -> String {
    match NaiveDate::parse_from_str(text.trim(), LEGISTAR_DATE_FORMAT) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => {
            debug!("keeping unparsed meeting date {:?}", text);
            text.trim().to_string()
        }
    }
}

fn required<'r>(row: &'r TableRow, column: &str) -> Result<&'r str, ScrapeError> {
    row.text(column)
        .ok_or_else(|| ScrapeError::structure_missing(format!("column {:?}", column)))
}

/// Expands meeting rows into one record per linked agenda or minutes document.
pub fn extract_doc_list<'r>(
    city: &str,
    rows: impl IntoIterator<Item = &'r TableRow>,
) -> Result<Vec<DocumentRecord>, ScrapeError> {
    let mut docs = vec![];
    for row in rows {
        let date = normalize_date(required(row, DATE_COLUMN)?);
        let committee = required(row, COMMITTEE_COLUMN)?;

        for (doc_type, column) in URL_COLUMNS {
            let url = match row.url(column) {
                Some(url) if !url.is_empty() => url,
                _ => continue,
            };
            docs.push(DocumentRecord {
                city: city.to_string(),
                date: date.clone(),
                committee: committee.to_string(),
                doc_type,
                url: url.to_string(),
                doc_format: DOC_FORMAT.to_string(),
            });
        }
    }
    Ok(docs)
}
