//! Request validation and feature normalization.
//!
//! Turns an untrusted JSON object into either a well-typed [`FeatureRecord`]
//! or a [`ValidationErrors`] map with one message per offending field. Both
//! required fields are checked independently so all errors surface together.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Carrier value used when the request does not name one.
pub const UNKNOWN_CARRIER: &str = "UNKNOWN";

/// Day of week as the delay model knows it, ordinal 1 (Monday) through
/// 7 (Sunday). Serializes as the English day name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Map an ordinal in [1,7] to its day, `None` outside that range.
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        match ordinal {
            1 => Some(Self::Monday),
            2 => Some(Self::Tuesday),
            3 => Some(Self::Wednesday),
            4 => Some(Self::Thursday),
            5 => Some(Self::Friday),
            6 => Some(Self::Saturday),
            7 => Some(Self::Sunday),
            _ => None,
        }
    }

    /// Ordinal of this day, 1 (Monday) through 7 (Sunday).
    pub fn ordinal(self) -> u8 {
        match self {
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
            Self::Sunday => 7,
        }
    }

    /// English day name as used in the model's feature schema.
    pub fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

/// A normalized feature row in the exact shape the delay model expects.
///
/// Constructed only by [`normalize`], and only when both `airport_id` and
/// `day_of_week` coerced to integers with `day_of_week` in [1,7].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRecord {
    /// Carrier code, passed through verbatim from the request.
    pub carrier: String,
    /// Origin airport, defaulted to 0 when absent or not coercible.
    pub origin_airport_id: i64,
    /// Destination airport (the request's `airport_id`).
    pub dest_airport_id: i64,
    /// Day of week the flight departs.
    pub day_of_week: Weekday,
}

/// Field-scoped validation failures, keyed by request field name.
///
/// The keys present are exactly the fields that failed; a non-empty map
/// means the request is rejected. Keys iterate in a deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    fn insert(&mut self, field: &'static str, message: &str) {
        self.0.insert(field, message.to_string());
    }

    /// Whether any field failed validation.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Message recorded for a field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Number of failed fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Coerce an arbitrary JSON value to an integer.
///
/// Accepts integers, integer-valued floats, and strings that parse as an
/// integer after trimming ASCII whitespace. Everything else (null, booleans,
/// fractional floats, non-numeric strings, arrays, objects) fails.
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64()
                    .filter(|f| {
                        f.fract() == 0.0
                            && *f >= i64::MIN as f64
                            && *f <= i64::MAX as f64
                    })
                    .map(|f| f as i64)
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Carrier passthrough: strings go through untouched, absent or null becomes
/// [`UNKNOWN_CARRIER`], and any other scalar is rendered as its JSON text.
fn coerce_carrier(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => UNKNOWN_CARRIER.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Validate and normalize a raw prediction request.
///
/// `raw` is the request body as parsed JSON; anything that is not an object
/// behaves as the empty object, so a missing body produces the two
/// required-field errors rather than a parse failure.
///
/// `origin_airport_id` is deliberately asymmetric with `airport_id`: a value
/// that fails coercion silently defaults to 0 instead of erroring.
pub fn normalize(raw: &Value) -> Result<FeatureRecord, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let dest_airport_id = raw.get("airport_id").and_then(coerce_int);
    if dest_airport_id.is_none() {
        errors.insert("airport_id", "airport_id is required");
    }

    let day_of_week = match raw.get("day_of_week").and_then(coerce_int) {
        None => {
            errors.insert("day_of_week", "day_of_week is required");
            None
        }
        Some(ordinal) => match Weekday::from_ordinal(ordinal) {
            Some(day) => Some(day),
            None => {
                errors.insert(
                    "day_of_week",
                    "day_of_week must be an integer between 1 and 7",
                );
                None
            }
        },
    };

    let carrier = coerce_carrier(raw.get("carrier"));
    let origin_airport_id = raw
        .get("origin_airport_id")
        .and_then(coerce_int)
        .unwrap_or(0);

    match (dest_airport_id, day_of_week) {
        (Some(dest_airport_id), Some(day_of_week)) => Ok(FeatureRecord {
            carrier,
            origin_airport_id,
            dest_airport_id,
            day_of_week,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_weekday_ordinals_round_trip() {
        let expected = [
            (1, "Monday"),
            (2, "Tuesday"),
            (3, "Wednesday"),
            (4, "Thursday"),
            (5, "Friday"),
            (6, "Saturday"),
            (7, "Sunday"),
        ];

        for (ordinal, name) in expected {
            let day = Weekday::from_ordinal(ordinal).unwrap();
            assert_eq!(day.name(), name);
            assert_eq!(i64::from(day.ordinal()), ordinal);
        }
    }

    #[test]
    fn test_weekday_rejects_out_of_range() {
        for ordinal in [0, 8, -1, 100] {
            assert!(Weekday::from_ordinal(ordinal).is_none());
        }
    }

    #[test]
    fn test_normalize_full_request() {
        let raw = json!({
            "airport_id": 12892,
            "day_of_week": 1,
            "carrier": "DL",
            "origin_airport_id": 15304,
        });

        let record = normalize(&raw).unwrap();
        assert_eq!(record.carrier, "DL");
        assert_eq!(record.origin_airport_id, 15304);
        assert_eq!(record.dest_airport_id, 12892);
        assert_eq!(record.day_of_week, Weekday::Monday);
    }

    #[test]
    fn test_normalize_every_valid_day() {
        for ordinal in 1..=7 {
            let raw = json!({"airport_id": 1, "day_of_week": ordinal});
            let record = normalize(&raw).unwrap();
            assert_eq!(i64::from(record.day_of_week.ordinal()), ordinal);
        }
    }

    #[test]
    fn test_normalize_accepts_stringy_integers() {
        let raw = json!({
            "airport_id": "12892",
            "day_of_week": " 3 ",
            "origin_airport_id": "15304",
        });

        let record = normalize(&raw).unwrap();
        assert_eq!(record.dest_airport_id, 12892);
        assert_eq!(record.day_of_week, Weekday::Wednesday);
        assert_eq!(record.origin_airport_id, 15304);
    }

    #[test]
    fn test_normalize_accepts_integer_valued_floats() {
        let raw = json!({"airport_id": 12892.0, "day_of_week": 2.0});
        let record = normalize(&raw).unwrap();
        assert_eq!(record.dest_airport_id, 12892);
        assert_eq!(record.day_of_week, Weekday::Tuesday);
    }

    #[test]
    fn test_normalize_rejects_fractional_floats() {
        let raw = json!({"airport_id": 3.7, "day_of_week": 1});
        let errors = normalize(&raw).unwrap_err();
        assert_eq!(errors.get("airport_id"), Some("airport_id is required"));
        assert!(errors.get("day_of_week").is_none());
    }

    #[test]
    fn test_normalize_missing_body_reports_both_fields() {
        let errors = normalize(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("airport_id"), Some("airport_id is required"));
        assert_eq!(errors.get("day_of_week"), Some("day_of_week is required"));
    }

    #[test]
    fn test_normalize_non_object_behaves_as_empty() {
        for raw in [json!(null), json!("body"), json!([1, 2])] {
            let errors = normalize(&raw).unwrap_err();
            assert_eq!(errors.len(), 2);
        }
    }

    #[test]
    fn test_normalize_day_out_of_range_message() {
        for day in [0, 8, -1] {
            let raw = json!({"airport_id": 1, "day_of_week": day});
            let errors = normalize(&raw).unwrap_err();
            assert_eq!(
                errors.get("day_of_week"),
                Some("day_of_week must be an integer between 1 and 7")
            );
        }
    }

    #[test]
    fn test_normalize_day_coercion_failure_message() {
        for day in [json!("abc"), json!(null), json!(true), json!(1.5)] {
            let raw = json!({"airport_id": 1, "day_of_week": day});
            let errors = normalize(&raw).unwrap_err();
            assert_eq!(errors.get("day_of_week"), Some("day_of_week is required"));
        }
    }

    #[test]
    fn test_normalize_carrier_defaults_to_unknown() {
        let raw = json!({"airport_id": 1, "day_of_week": 1});
        let record = normalize(&raw).unwrap();
        assert_eq!(record.carrier, UNKNOWN_CARRIER);

        let raw = json!({"airport_id": 1, "day_of_week": 1, "carrier": null});
        let record = normalize(&raw).unwrap();
        assert_eq!(record.carrier, UNKNOWN_CARRIER);
    }

    #[test]
    fn test_normalize_carrier_passthrough_is_not_validated() {
        let raw = json!({"airport_id": 1, "day_of_week": 1, "carrier": "dl lowercase ok"});
        let record = normalize(&raw).unwrap();
        assert_eq!(record.carrier, "dl lowercase ok");

        // Non-string scalars pass through as their JSON text.
        let raw = json!({"airport_id": 1, "day_of_week": 1, "carrier": 9});
        let record = normalize(&raw).unwrap();
        assert_eq!(record.carrier, "9");
    }

    #[test]
    fn test_normalize_origin_defaults_silently() {
        for origin in [json!("abc"), json!(null), json!(2.5), json!([])] {
            let raw = json!({"airport_id": 1, "day_of_week": 1, "origin_airport_id": origin});
            let record = normalize(&raw).unwrap();
            assert_eq!(record.origin_airport_id, 0, "origin {:?}", origin);
        }

        let raw = json!({"airport_id": 1, "day_of_week": 1});
        let record = normalize(&raw).unwrap();
        assert_eq!(record.origin_airport_id, 0);
    }

    #[test]
    fn test_normalize_both_errors_co_occur() {
        let raw = json!({"airport_id": "LAX", "day_of_week": "someday"});
        let errors = normalize(&raw).unwrap_err();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validation_errors_serialize_as_map() {
        let errors = normalize(&json!({})).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            json!({
                "airport_id": "airport_id is required",
                "day_of_week": "day_of_week is required",
            })
        );
    }

    #[test]
    fn test_feature_record_serializes_day_name() {
        let record = normalize(&json!({"airport_id": 1, "day_of_week": 7})).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["day_of_week"], "Sunday");
    }
}
