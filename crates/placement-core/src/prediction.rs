use std::fmt;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictionError {
    #[error("prediction '{0}' is not a number")]
    NotANumber(String),
    #[error("prediction {0} is out of range")]
    OutOfRange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lpa {
    hundredths: u128,
}

impl Lpa {
    pub fn from_hundredths(hundredths: u128) -> Self {
        Self { hundredths }
    }

    // Rounds half-up on the shortest decimal rendering, so 7.835 gives 7.84.
    pub fn from_raw(raw: f64) -> Result<Self, PredictionError> {
        if raw.is_nan() {
            return Err(PredictionError::NotANumber(raw.to_string()));
        }
        if raw.is_infinite() {
            return Err(PredictionError::OutOfRange(raw.to_string()));
        }
        if raw <= 0.0 {
            return Ok(Self::from_hundredths(0));
        }

        let rendered = raw.to_string();
        let (whole, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
        let mut digits = fraction.chars();
        let tenths = digits.next().unwrap_or('0');
        let hundredths = digits.next().unwrap_or('0');
        let round_up = digits.next().is_some_and(|digit| digit >= '5');

        let scaled = format!("{whole}{tenths}{hundredths}")
            .parse::<u128>()
            .map_err(|_| PredictionError::OutOfRange(rendered.clone()))?;
        let scaled = if round_up {
            scaled
                .checked_add(1)
                .ok_or_else(|| PredictionError::OutOfRange(rendered.clone()))?
        } else {
            scaled
        };

        Ok(Self::from_hundredths(scaled))
    }
}

impl fmt::Display for Lpa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.hundredths / 100, self.hundredths % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum RawPrediction {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionResponse {
    prediction: RawPrediction,
}

impl PredictionResponse {
    pub fn into_lpa(self) -> Result<Lpa, PredictionError> {
        let raw = match self.prediction {
            RawPrediction::Number(value) => value,
            RawPrediction::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| PredictionError::NotANumber(text.clone()))?,
        };
        Lpa::from_raw(raw)
    }
}
