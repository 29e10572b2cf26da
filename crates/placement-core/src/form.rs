use std::collections::BTreeMap;

use thiserror::Error;

use crate::schema::{ATTRIBUTES, Attribute, FieldKind, choice_index};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("'{value}' is not a choice for {attribute}")]
    UnknownChoice { attribute: Attribute, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateProfile {
    values: BTreeMap<Attribute, String>,
}

impl Default for CandidateProfile {
    fn default() -> Self {
        Self {
            values: ATTRIBUTES
                .iter()
                .map(|attribute| (*attribute, attribute.default_value()))
                .collect(),
        }
    }
}

impl CandidateProfile {
    pub fn get(&self, attribute: Attribute) -> &str {
        self.values
            .get(&attribute)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn with(&self, attribute: Attribute, value: impl Into<String>) -> Self {
        let mut values = self.values.clone();
        values.insert(attribute, value.into());
        Self { values }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateForm {
    name: String,
    profile: CandidateProfile,
}

impl CandidateForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn value(&self, attribute: Attribute) -> &str {
        self.profile.get(attribute)
    }

    pub fn set(&mut self, attribute: Attribute, value: impl Into<String>) -> Result<(), FieldError> {
        let value = value.into();
        if let FieldKind::Categorical { choices } = attribute.kind()
            && choice_index(choices, &value).is_none()
        {
            return Err(FieldError::UnknownChoice { attribute, value });
        }

        self.profile = self.profile.with(attribute, value);
        Ok(())
    }

    pub fn reset_all(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_form_holds_documented_defaults() {
        let form = CandidateForm::new();
        assert_eq!(form.name(), "");
        assert_eq!(form.value(Attribute::Cgpa), "");
        assert_eq!(form.value(Attribute::Branch), "CSE");
        assert_eq!(form.value(Attribute::CommunicationSkill), "50");
        for attribute in ATTRIBUTES {
            assert_eq!(form.value(attribute), attribute.default_value());
        }
    }

    #[test]
    fn keyed_updates_do_not_clobber_other_keys() {
        let mut form = CandidateForm::new();
        form.set(Attribute::Cgpa, "8.5").expect("cgpa");
        form.set(Attribute::Projects, "3").expect("projects");

        assert_eq!(form.value(Attribute::Cgpa), "8.5");
        assert_eq!(form.value(Attribute::Projects), "3");
        assert_eq!(form.value(Attribute::Internships), "");
    }

    #[test]
    fn with_leaves_original_profile_untouched() {
        let original = CandidateProfile::default();
        let updated = original.with(Attribute::Age, "21");

        assert_eq!(original.get(Attribute::Age), "");
        assert_eq!(updated.get(Attribute::Age), "21");
    }

    #[test]
    fn categorical_update_rejects_unknown_choice() {
        let mut form = CandidateForm::new();
        let error = form
            .set(Attribute::CollegeTag, "MIT")
            .expect_err("should reject");
        assert_eq!(error.to_string(), "'MIT' is not a choice for CollegeTag");
        assert_eq!(form.value(Attribute::CollegeTag), "IIT");
    }

    #[test]
    fn reset_all_restores_name_and_every_attribute() {
        let mut form = CandidateForm::new();
        form.set_name("Asha");
        form.set(Attribute::Branch, "IT").expect("branch");
        form.set(Attribute::Backlogs, "2").expect("backlogs");
        form.set(Attribute::CommunicationSkill, "80")
            .expect("slider");

        form.reset_all();

        assert_eq!(form, CandidateForm::new());
    }
}
