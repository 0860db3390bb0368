//! Prediction interpretation.
//!
//! Takes a normalized [`FeatureRecord`], asks a [`Classifier`] for its
//! probability distribution, and translates the raw output into the stable
//! response contract: label, probability, confidence, and an echo of the
//! accepted inputs.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::features::FeatureRecord;
use crate::model::{Classifier, DELAYED_CLASS_LABEL};

/// Outcome label for a scored flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayLabel {
    /// Delay probability at or above the 0.5 decision boundary.
    Delayed,
    /// Delay probability below the boundary.
    OnTime,
}

/// The accepted request fields, echoed back verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoedInput {
    /// Destination airport, as validated.
    pub airport_id: i64,
    /// Day of week ordinal, 1 (Monday) through 7 (Sunday).
    pub day_of_week: u8,
    /// Carrier code after defaulting.
    pub carrier: String,
    /// Origin airport after defaulting.
    pub origin_airport_id: i64,
}

/// Interpreted prediction returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// The inputs the prediction was computed from.
    pub input: EchoedInput,
    /// Outcome label, ties at the boundary break to delayed.
    pub prediction: DelayLabel,
    /// Probability of a delay over 15 minutes, straight from the
    /// classifier, unrounded.
    pub delay_probability: f64,
    /// The same probability as a percentage in [0,100].
    pub delay_probability_percent: f64,
    /// Distance of the probability from the decision boundary as a
    /// percentage in [50,100]. Not a model-reported statistic.
    pub model_confidence_percent: f64,
}

/// Score one feature record and interpret the classifier's output.
///
/// The "delayed" column is the one labeled [`DELAYED_CLASS_LABEL`]. When a
/// backend does not expose that label, the second column is assumed when
/// more than one exists, otherwise the only column. That fallback is a
/// defensive default for backends with non-standard labels, not a
/// guaranteed-correct inference.
///
/// Classifier failures and malformed probability matrices propagate as
/// errors; they indicate a broken deployment, not a bad request.
pub fn predict_delay<C>(record: &FeatureRecord, classifier: &C) -> Result<PredictionResult>
where
    C: Classifier + ?Sized,
{
    let proba = classifier.predict_proba(std::slice::from_ref(record))?;
    let row = proba.into_iter().next().ok_or(Error::EmptyProbabilities)?;
    if row.is_empty() {
        return Err(Error::EmptyProbabilities);
    }

    let classes = classifier.classes();
    let delayed_column = classes
        .iter()
        .position(|&label| label == DELAYED_CLASS_LABEL)
        .unwrap_or(usize::from(row.len() > 1));

    let delay_probability = *row.get(delayed_column).ok_or(Error::ClassColumnMismatch {
        columns: row.len(),
        classes: classes.len(),
    })?;

    let prediction = if delay_probability >= 0.5 {
        DelayLabel::Delayed
    } else {
        DelayLabel::OnTime
    };
    let confidence = delay_probability.max(1.0 - delay_probability);

    Ok(PredictionResult {
        input: EchoedInput {
            airport_id: record.dest_airport_id,
            day_of_week: record.day_of_week.ordinal(),
            carrier: record.carrier.clone(),
            origin_airport_id: record.origin_airport_id,
        },
        prediction,
        delay_probability,
        delay_probability_percent: delay_probability * 100.0,
        model_confidence_percent: confidence * 100.0,
    })
}
