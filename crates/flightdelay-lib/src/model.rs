//! Classifier abstraction and the shipped delay model.
//!
//! [`Classifier`] is the seam between the prediction pipeline and whatever
//! probabilistic backend answers it: an ordered list of class labels plus a
//! probability row per feature row, columns aligned with the labels.
//!
//! [`DelayModel`] is the concrete backend this service ships: a one-hot
//! logistic scorer whose fitted parameters (class labels, intercept, and
//! per-category weight tables) are exported to a JSON artifact at training
//! time and rehydrated here with `serde_json`.

use std::collections::HashMap;
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::FeatureRecord;

/// Class label the model assigns to "delayed more than 15 minutes".
pub const DELAYED_CLASS_LABEL: i64 = 1;

/// A probabilistic classifier over normalized feature rows.
///
/// The label list and the probability columns are parallel; callers must
/// read the ordering from [`classes`](Classifier::classes) rather than
/// assume `[on_time, delayed]`.
pub trait Classifier {
    /// Ordered class labels aligned with the probability columns.
    fn classes(&self) -> &[i64];

    /// Estimate a probability distribution for each feature row.
    ///
    /// Errors indicate a broken artifact or schema mismatch, never bad
    /// request input.
    fn predict_proba(&self, rows: &[FeatureRecord]) -> Result<Vec<Vec<f64>>>;
}

/// Fitted delay model parameters, persisted as a JSON artifact.
///
/// Scoring is a one-hot logistic regression over the four feature columns:
/// the intercept plus one looked-up weight per category, squashed through a
/// sigmoid. Categories absent from a weight table contribute 0, matching
/// an encoder trained with unknown categories ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DelayModel {
    /// Class labels in probability-column order. Exactly two entries.
    classes: Vec<i64>,
    /// Intercept of the fitted model.
    intercept: f64,
    /// Per-carrier weights.
    carrier_weights: HashMap<String, f64>,
    /// Per-origin-airport weights.
    origin_weights: HashMap<i64, f64>,
    /// Per-destination-airport weights.
    dest_weights: HashMap<i64, f64>,
    /// Per-day-name weights (keys are English day names).
    day_weights: HashMap<String, f64>,
}

impl DelayModel {
    /// Load the model artifact from a file path.
    ///
    /// A missing file is a fatal startup condition and yields
    /// [`Error::ModelNotFound`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(Error::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = fs::File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load the model artifact from a reader (e.g., file or in-memory buffer).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let model: Self =
            serde_json::from_reader(reader).map_err(|err| Error::ModelParse {
                message: err.to_string(),
            })?;

        if model.classes.len() != 2 {
            return Err(Error::ModelClassCount {
                count: model.classes.len(),
            });
        }

        Ok(model)
    }

    /// Linear score for one feature row before the sigmoid.
    fn score(&self, record: &FeatureRecord) -> f64 {
        self.intercept
            + self
                .carrier_weights
                .get(&record.carrier)
                .copied()
                .unwrap_or(0.0)
            + self
                .origin_weights
                .get(&record.origin_airport_id)
                .copied()
                .unwrap_or(0.0)
            + self
                .dest_weights
                .get(&record.dest_airport_id)
                .copied()
                .unwrap_or(0.0)
            + self
                .day_weights
                .get(record.day_of_week.name())
                .copied()
                .unwrap_or(0.0)
    }
}

impl Classifier for DelayModel {
    fn classes(&self) -> &[i64] {
        &self.classes
    }

    fn predict_proba(&self, rows: &[FeatureRecord]) -> Result<Vec<Vec<f64>>> {
        let proba = rows
            .iter()
            .map(|record| {
                let delayed = sigmoid(self.score(record));
                self.classes
                    .iter()
                    .map(|&label| {
                        if label == DELAYED_CLASS_LABEL {
                            delayed
                        } else {
                            1.0 - delayed
                        }
                    })
                    .collect()
            })
            .collect();

        Ok(proba)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{normalize, Weekday};
    use serde_json::json;

    fn artifact() -> String {
        json!({
            "classes": [0, 1],
            "intercept": -0.5,
            "carrier_weights": {"DL": 0.25, "WN": -0.1},
            "origin_weights": {"15304": 0.2},
            "dest_weights": {"12892": 0.4},
            "day_weights": {"Monday": 0.15, "Sunday": -0.05},
        })
        .to_string()
    }

    fn record(carrier: &str, origin: i64, dest: i64, day: Weekday) -> FeatureRecord {
        FeatureRecord {
            carrier: carrier.to_string(),
            origin_airport_id: origin,
            dest_airport_id: dest,
            day_of_week: day,
        }
    }

    #[test]
    fn test_artifact_round_trip() {
        let model = DelayModel::from_reader(artifact().as_bytes()).unwrap();
        assert_eq!(model.classes(), &[0, 1]);
    }

    #[test]
    fn test_malformed_artifact_fails_parse() {
        let result = DelayModel::from_reader("{not json".as_bytes());
        assert!(matches!(result, Err(Error::ModelParse { .. })));

        let result = DelayModel::from_reader(r#"{"classes": [0, 1]}"#.as_bytes());
        assert!(matches!(result, Err(Error::ModelParse { .. })));
    }

    #[test]
    fn test_artifact_requires_two_classes() {
        let artifact = json!({
            "classes": [0, 1, 2],
            "intercept": 0.0,
            "carrier_weights": {},
            "origin_weights": {},
            "dest_weights": {},
            "day_weights": {},
        })
        .to_string();

        match DelayModel::from_reader(artifact.as_bytes()).unwrap_err() {
            Error::ModelClassCount { count } => assert_eq!(count, 3),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_path_missing_artifact() {
        let result = DelayModel::from_path("/nonexistent/delay_model.json");
        assert!(matches!(result, Err(Error::ModelNotFound { .. })));
    }

    #[test]
    fn test_proba_rows_sum_to_one() {
        let model = DelayModel::from_reader(artifact().as_bytes()).unwrap();
        let rows = vec![
            record("DL", 15304, 12892, Weekday::Monday),
            record("ZZ", 0, 0, Weekday::Thursday),
        ];

        let proba = model.predict_proba(&rows).unwrap();
        assert_eq!(proba.len(), 2);
        for row in &proba {
            assert_eq!(row.len(), 2);
            assert!((row[0] + row[1] - 1.0).abs() < 1e-12);
            assert!(row.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn test_proba_columns_follow_class_order() {
        // Same parameters, delayed label listed first.
        let swapped = json!({
            "classes": [1, 0],
            "intercept": 2.0,
            "carrier_weights": {},
            "origin_weights": {},
            "dest_weights": {},
            "day_weights": {},
        })
        .to_string();

        let model = DelayModel::from_reader(swapped.as_bytes()).unwrap();
        let rows = vec![record("DL", 0, 0, Weekday::Monday)];
        let proba = model.predict_proba(&rows).unwrap();

        // intercept 2.0 with no weights: sigmoid(2.0) > 0.5, and the delayed
        // column is the first one here.
        assert!(proba[0][0] > 0.5);
        assert!(proba[0][1] < 0.5);
    }

    #[test]
    fn test_unknown_categories_score_with_intercept_only() {
        let model = DelayModel::from_reader(artifact().as_bytes()).unwrap();
        let rows = vec![record("??", 999, 999, Weekday::Wednesday)];
        let proba = model.predict_proba(&rows).unwrap();

        let expected = sigmoid(-0.5);
        assert!((proba[0][1] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_weights_move_the_probability() {
        let model = DelayModel::from_reader(artifact().as_bytes()).unwrap();

        let base = model
            .predict_proba(&[record("??", 0, 0, Weekday::Wednesday)])
            .unwrap()[0][1];
        let loaded = model
            .predict_proba(&[record("DL", 15304, 12892, Weekday::Monday)])
            .unwrap()[0][1];

        // All fixture weights for this row are positive.
        assert!(loaded > base);
    }

    #[test]
    fn test_idempotent_scoring() {
        let model = DelayModel::from_reader(artifact().as_bytes()).unwrap();
        let raw = json!({"airport_id": 12892, "day_of_week": 1, "carrier": "DL"});

        let first = model.predict_proba(&[normalize(&raw).unwrap()]).unwrap();
        let second = model.predict_proba(&[normalize(&raw).unwrap()]).unwrap();
        assert_eq!(first, second);
    }
}
