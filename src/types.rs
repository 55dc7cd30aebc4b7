use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use crate::{documents::DocumentRecord, driver::DriverError};

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("filter_not_found: {value:?} is not an option of {field}")]
    FilterNotFound { field: String, value: String },
    #[error("structure_missing: {0}")]
    StructureMissing(String),
    #[error("driver: {0}")]
    Driver(#[from] DriverError),
}

impl ScrapeError {
    /// Failures that end the current target with an empty result.
    pub fn is_target_abort(&self) -> bool {
        matches!(
            self,
            ScrapeError::FilterNotFound { .. } | ScrapeError::StructureMissing(_)
        )
    }

    pub fn structure_missing(what: impl Into<String>) -> ScrapeError {
        ScrapeError::StructureMissing(what.into())
    }
}

/// One rendered page of results.
#[derive(Debug, Clone)]
pub struct PageCapture {
    pub number: usize,
    pub markup: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CityTarget {
    pub city_name: String,
    pub scrape_url: String,
}

#[derive(Debug, Default)]
pub struct ScrapeOutput {
    pub documents: Vec<DocumentRecord>,
    pub path: Option<PathBuf>,
}

impl ScrapeOutput {
    pub fn empty() -> Self {
        ScrapeOutput::default()
    }
}
