//! Field projection, CSV parameter parsing, and in-memory pagination.

use crate::types::Record;
use crate::{HolonetError, Result};

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: usize = 100;

/// Split a comma-separated parameter, trimming entries and dropping empties.
pub fn parse_csv(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Keep only the requested fields that exist on `record`, in request order.
///
/// An empty field list keeps the record as is.
pub fn project(record: Record, fields: &[String]) -> Record {
    if fields.is_empty() {
        return record;
    }
    fields
        .iter()
        .filter_map(|f| record.get(f).map(|v| (f.clone(), v.clone())))
        .collect()
}

pub fn project_all(records: Vec<Record>, fields: &[String]) -> Vec<Record> {
    if fields.is_empty() {
        return records;
    }
    records.into_iter().map(|r| project(r, fields)).collect()
}

/// A validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub page_size: usize,
}

impl PageWindow {
    /// Validate `page >= 1` and `1 <= page_size <= MAX_PAGE_SIZE`.
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        if page < 1 {
            return Err(HolonetError::BadRequest("page must be >= 1".into()));
        }
        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(HolonetError::BadRequest(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Self { page, page_size })
    }
}

/// Slice out one page. Pages past the end are empty.
pub fn paginate(records: Vec<Record>, window: PageWindow) -> Vec<Record> {
    let start = (window.page - 1).saturating_mul(window.page_size);
    records
        .into_iter()
        .skip(start)
        .take(window.page_size)
        .collect()
}
