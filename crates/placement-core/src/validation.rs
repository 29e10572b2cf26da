use thiserror::Error;

use crate::form::CandidateForm;
use crate::payload::{FeatureValue, ValidatedProfile};
use crate::schema::{ATTRIBUTES, Attribute, FieldKind, NumberKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name required")]
    NameRequired,
    #[error("missing field: {0}")]
    MissingField(Attribute),
    #[error("invalid value: {0}")]
    InvalidValue(Attribute),
}

pub fn validate(form: &CandidateForm) -> Result<ValidatedProfile, ValidationError> {
    if form.name().trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }

    if let Some(attribute) = ATTRIBUTES
        .iter()
        .copied()
        .find(|attribute| form.value(*attribute).trim().is_empty())
    {
        return Err(ValidationError::MissingField(attribute));
    }

    let values = ATTRIBUTES
        .iter()
        .map(|attribute| {
            parse_value(*attribute, form.value(*attribute)).map(|value| (*attribute, value))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedProfile::new(values))
}

fn parse_value(attribute: Attribute, raw: &str) -> Result<FeatureValue, ValidationError> {
    let invalid = ValidationError::InvalidValue(attribute);
    let raw = raw.trim();

    match attribute.kind() {
        FieldKind::Numeric {
            number: NumberKind::Decimal,
            bound,
        } => {
            let value = raw.parse::<f64>().map_err(|_| invalid)?;
            if !value.is_finite() || value < 0.0 || !bound.admits(value) {
                return Err(invalid);
            }
            Ok(FeatureValue::Decimal(value))
        }
        FieldKind::Numeric {
            number: NumberKind::Count,
            bound,
        } => {
            let value = raw.parse::<i64>().map_err(|_| invalid)?;
            if value < 0 || !bound.admits(value as f64) {
                return Err(invalid);
            }
            Ok(FeatureValue::Integer(value))
        }
        FieldKind::Slider { min, max, .. } => {
            let value = raw.parse::<i64>().map_err(|_| invalid)?;
            if !(min..=max).contains(&value) {
                return Err(invalid);
            }
            Ok(FeatureValue::Integer(value))
        }
        FieldKind::Categorical { choices } => choices
            .iter()
            .find(|choice| choice.value == raw)
            .map(|choice| FeatureValue::Category(choice.value))
            .ok_or(invalid),
    }
}
