//! Client-side sorting.

use std::cmp::Ordering;

use serde_json::Value;

use crate::types::Record;
use crate::{HolonetError, Result};

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `desc` in any case is descending; everything else is ascending.
    pub fn parse(order: Option<&str>) -> Self {
        match order {
            Some(o) if o.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }
}

/// Sort records by `field`.
///
/// Digit-only strings compare as integers, so `"66" < "150" < "172"`. The
/// sort is stable in both directions. The field must exist on the first
/// record; otherwise it is rejected as unknown.
pub fn sort_records(
    mut records: Vec<Record>,
    field: Option<&str>,
    order: SortOrder,
) -> Result<Vec<Record>> {
    let Some(field) = field.filter(|f| !f.is_empty()) else {
        return Ok(records);
    };
    let Some(first) = records.first() else {
        return Ok(records);
    };
    if !first.contains(field) {
        return Err(HolonetError::BadRequest(format!(
            "Invalid sort field: {field}"
        )));
    }

    records.sort_by(|a, b| {
        let ordering = compare(sort_key(a.get(field)), sort_key(b.get(field)));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
    Ok(records)
}

/// Comparable projection of a field value.
///
/// Variant order defines the order between kinds: missing/null first, then
/// booleans, numbers, strings, and anything structured last.
#[derive(Debug, PartialEq, PartialOrd)]
enum SortKey<'a> {
    Missing,
    Bool(bool),
    Number(f64),
    Text(&'a str),
    Other(String),
}

fn sort_key(value: Option<&Value>) -> SortKey<'_> {
    match value {
        None | Some(Value::Null) => SortKey::Missing,
        Some(Value::Bool(b)) => SortKey::Bool(*b),
        Some(Value::Number(n)) => SortKey::Number(n.as_f64().unwrap_or(f64::NAN)),
        Some(Value::String(s)) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            SortKey::Number(s.parse::<f64>().unwrap_or(f64::NAN))
        }
        Some(Value::String(s)) => SortKey::Text(s),
        Some(other) => SortKey::Other(other.to_string()),
    }
}

fn compare(a: SortKey<'_>, b: SortKey<'_>) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| Record::from_value(v).unwrap())
            .collect()
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records.iter().filter_map(|r| r.get_str("name")).collect()
    }

    #[test]
    fn sorts_names_ascending() {
        let out = sort_records(
            records(vec![json!({"name": "Leia"}), json!({"name": "Anakin"})]),
            Some("name"),
            SortOrder::Asc,
        )
        .unwrap();
        assert_eq!(names(&out), vec!["Anakin", "Leia"]);
    }

    #[test]
    fn sorts_names_descending() {
        let out = sort_records(
            records(vec![json!({"name": "Leia"}), json!({"name": "Anakin"})]),
            Some("name"),
            SortOrder::Desc,
        )
        .unwrap();
        assert_eq!(names(&out), vec!["Leia", "Anakin"]);
    }

    #[test]
    fn digit_strings_sort_numerically() {
        let out = sort_records(
            records(vec![
                json!({"name": "Luke", "height": "172"}),
                json!({"name": "Yoda", "height": "66"}),
                json!({"name": "Leia", "height": "150"}),
            ]),
            Some("height"),
            SortOrder::Asc,
        )
        .unwrap();
        assert_eq!(names(&out), vec!["Yoda", "Leia", "Luke"]);
    }

    #[test]
    fn descending_sort_is_stable() {
        let out = sort_records(
            records(vec![
                json!({"name": "A", "gender": "male"}),
                json!({"name": "B", "gender": "female"}),
                json!({"name": "C", "gender": "male"}),
            ]),
            Some("gender"),
            SortOrder::Desc,
        )
        .unwrap();
        assert_eq!(names(&out), vec!["A", "C", "B"]);
    }

    #[test]
    fn unknown_field_is_bad_request() {
        let err = sort_records(
            records(vec![json!({"name": "Luke"})]),
            Some("midichlorians"),
            SortOrder::Asc,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Invalid sort field"));
    }

    #[test]
    fn empty_input_and_missing_field_are_noops() {
        assert!(
            sort_records(Vec::new(), Some("anything"), SortOrder::Asc)
                .unwrap()
                .is_empty()
        );
        let input = records(vec![json!({"name": "B"}), json!({"name": "A"})]);
        let out = sort_records(input.clone(), None, SortOrder::Asc).unwrap();
        assert_eq!(out, input);
    }

    #[test]
    fn order_parsing() {
        assert_eq!(SortOrder::parse(Some("DESC")), SortOrder::Desc);
        assert_eq!(SortOrder::parse(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(Some("sideways")), SortOrder::Asc);
        assert_eq!(SortOrder::parse(None), SortOrder::Asc);
    }
}
