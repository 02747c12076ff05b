//! Upstream list payloads.

use serde_json::Value;

use super::Record;
use crate::{HolonetError, Result};

/// One page of an upstream list resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Total number of items upstream, when reported.
    pub count: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Record>,
}

impl Page {
    /// Interpret a fetched payload as a list page.
    ///
    /// A missing `results` field is an empty page. A `results` field that is
    /// not a list of objects is a malformed upstream payload.
    pub fn from_record(payload: &Record) -> Result<Self> {
        let results = match payload.get("results") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .cloned()
                .map(Record::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(HolonetError::upstream(
                    "malformed upstream payload: `results` is not a list",
                ));
            }
        };

        Ok(Self {
            count: payload.get("count").and_then(Value::as_u64),
            next: payload.get_str("next").map(str::to_string),
            previous: payload.get_str("previous").map(str::to_string),
            results,
        })
    }
}
