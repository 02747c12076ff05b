//! Client-side record filters.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::Record;
use crate::{HolonetError, Result};

/// Raw filter values as received from the caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub gender: Option<String>,
    pub eye_color: Option<String>,
    pub hair_color: Option<String>,
    pub climate: Option<String>,
    pub terrain: Option<String>,
    pub starship_class: Option<String>,
    pub min_height: Option<String>,
    pub max_height: Option<String>,
    pub min_population: Option<String>,
    pub max_population: Option<String>,
}

/// Validated filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    equals: Vec<(&'static str, String)>,
    ranges: Vec<RangeFilter>,
}

#[derive(Debug, Clone, PartialEq)]
struct RangeFilter {
    param: &'static str,
    field: &'static str,
    bound: Bound,
    value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
    Min,
    Max,
}

impl Filters {
    /// Validate raw parameters. Range bounds must be integers.
    pub fn parse(params: &FilterParams) -> Result<Self> {
        let equals = [
            ("gender", &params.gender),
            ("eye_color", &params.eye_color),
            ("hair_color", &params.hair_color),
            ("climate", &params.climate),
            ("terrain", &params.terrain),
            ("starship_class", &params.starship_class),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_ref().map(|v| (field, v.clone())))
        .collect();

        let mut ranges = Vec::new();
        for (param, field, bound, raw) in [
            ("min_height", "height", Bound::Min, &params.min_height),
            ("max_height", "height", Bound::Max, &params.max_height),
            ("min_population", "population", Bound::Min, &params.min_population),
            ("max_population", "population", Bound::Max, &params.max_population),
        ] {
            if let Some(raw) = raw {
                let value = raw.trim().parse::<i64>().map_err(|_| {
                    HolonetError::BadRequest(format!("Invalid integer for {param}: {raw}"))
                })?;
                ranges.push(RangeFilter {
                    param,
                    field,
                    bound,
                    value,
                });
            }
        }

        Ok(Self { equals, ranges })
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_empty() && self.ranges.is_empty()
    }

    /// Whether `record` passes every filter.
    ///
    /// Equality is case-insensitive on the string form of the field. Range
    /// filters only admit fields holding a plain non-negative integer
    /// string; `"unknown"` and friends are excluded.
    pub fn matches(&self, record: &Record) -> bool {
        let equals_ok = self.equals.iter().all(|(field, wanted)| {
            field_text(record, field).to_lowercase() == wanted.to_lowercase()
        });
        equals_ok
            && self.ranges.iter().all(|range| {
                match digits_value(record, range.field) {
                    Some(n) => match range.bound {
                        Bound::Min => n >= range.value,
                        Bound::Max => n <= range.value,
                    },
                    None => false,
                }
            })
    }

    pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
        if self.is_empty() {
            return records;
        }
        records.into_iter().filter(|r| self.matches(r)).collect()
    }

    /// The filters that were applied, keyed by parameter name.
    pub fn applied(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for (field, value) in &self.equals {
            out.insert((*field).to_string(), Value::from(value.clone()));
        }
        for range in &self.ranges {
            out.insert(range.param.to_string(), Value::from(range.value));
        }
        out
    }
}

fn field_text(record: &Record, field: &str) -> String {
    match record.get(field) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn digits_value(record: &Record, field: &str) -> Option<i64> {
    let text = field_text(record, field);
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
