use serde::Serialize;

use crate::schema::Attribute;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Decimal(f64),
    Integer(i64),
    Category(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub features: Vec<FeatureValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProfile {
    values: Vec<(Attribute, FeatureValue)>,
}

impl ValidatedProfile {
    pub(crate) fn new(values: Vec<(Attribute, FeatureValue)>) -> Self {
        Self { values }
    }

    pub fn get(&self, attribute: Attribute) -> Option<&FeatureValue> {
        self.values
            .iter()
            .find(|(candidate, _)| *candidate == attribute)
            .map(|(_, value)| value)
    }

    pub fn to_request(&self) -> PredictionRequest {
        PredictionRequest {
            features: self.values.iter().map(|(_, value)| value.clone()).collect(),
        }
    }
}
