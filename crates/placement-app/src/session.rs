use placement_core::form::{CandidateForm, FieldError};
use placement_core::payload::PredictionRequest;
use placement_core::prediction::Lpa;
use placement_core::predictor::TransportError;
use placement_core::schema::Attribute;
use placement_core::validation::{ValidationError, validate};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("error connecting to backend")]
    Transport(#[source] TransportError),
    #[error("a prediction request is already in flight")]
    InFlight,
    #[error("dismiss the shown prediction before submitting again")]
    ResultShown,
    #[error("response does not belong to the in-flight submission")]
    StaleResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting { token: u64 },
    ResultShown(Lpa),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendingSubmission {
    pub token: u64,
    pub request: PredictionRequest,
}

#[derive(Debug, Clone)]
pub struct FormSession {
    form: CandidateForm,
    phase: Phase,
    greeting: Option<String>,
    next_token: u64,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    pub fn new() -> Self {
        Self {
            form: CandidateForm::new(),
            phase: Phase::Idle,
            greeting: None,
            next_token: 1,
        }
    }

    pub fn form(&self) -> &CandidateForm {
        &self.form
    }

    pub fn name(&self) -> &str {
        self.form.name()
    }

    pub fn value(&self, attribute: Attribute) -> &str {
        self.form.value(attribute)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Submitting { .. })
    }

    pub fn visible_greeting(&self) -> Option<&str> {
        if self.is_loading() {
            return None;
        }
        self.greeting.as_deref()
    }

    pub fn prediction(&self) -> Option<Lpa> {
        match self.phase {
            Phase::ResultShown(lpa) => Some(lpa),
            _ => None,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.form.set_name(name);
    }

    pub fn set(&mut self, attribute: Attribute, value: impl Into<String>) -> Result<(), FieldError> {
        self.form.set(attribute, value)
    }

    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitError> {
        match self.phase {
            Phase::Submitting { .. } => return Err(SubmitError::InFlight),
            Phase::ResultShown(_) => return Err(SubmitError::ResultShown),
            Phase::Idle => {}
        }

        let profile = validate(&self.form).inspect_err(|error| {
            tracing::warn!(%error, "submission rejected by validation");
        })?;

        let token = self.next_token;
        self.next_token = self.next_token.wrapping_add(1);
        self.phase = Phase::Submitting { token };
        self.greeting = Some(format!(
            "Hello {}, calculating your predicted package...",
            self.form.name().trim()
        ));

        let request = profile.to_request();
        tracing::debug!(token, features = request.features.len(), "submission started");
        Ok(PendingSubmission { token, request })
    }

    pub fn finish_submit(
        &mut self,
        token: u64,
        outcome: Result<Lpa, TransportError>,
    ) -> Result<Lpa, SubmitError> {
        match self.phase {
            Phase::Submitting { token: current } if current == token => {}
            _ => return Err(SubmitError::StaleResponse),
        }

        self.phase = Phase::Idle;
        match outcome {
            Ok(lpa) => {
                self.phase = Phase::ResultShown(lpa);
                Ok(lpa)
            }
            Err(error) => {
                tracing::warn!(%error, token, "prediction request failed");
                Err(SubmitError::Transport(error))
            }
        }
    }

    pub fn dismiss(&mut self) -> bool {
        if !matches!(self.phase, Phase::ResultShown(_)) {
            return false;
        }

        self.form.reset_all();
        self.greeting = None;
        self.phase = Phase::Idle;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_session() -> FormSession {
        let mut session = FormSession::new();
        session.set_name("Asha");
        for (attribute, value) in [
            (Attribute::Cgpa, "8.1"),
            (Attribute::Internships, "1"),
            (Attribute::Projects, "3"),
            (Attribute::CompetitiveRank, "500"),
            (Attribute::CodeforcesRating, "1400"),
            (Attribute::ExperienceMonths, "0"),
            (Attribute::Age, "22"),
            (Attribute::Grade10, "90"),
            (Attribute::Grade12, "85"),
            (Attribute::Backlogs, "0"),
        ] {
            session.set(attribute, value).expect("set attribute");
        }
        session
    }

    #[test]
    fn validation_failure_keeps_session_idle() {
        let mut session = FormSession::new();
        let error = session.begin_submit().expect_err("blank name");
        assert!(matches!(
            error,
            SubmitError::Validation(ValidationError::NameRequired)
        ));
        assert_eq!(error.to_string(), "name required");
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.visible_greeting().is_none());
    }

    #[test]
    fn begin_submit_sets_loading_and_hides_greeting_until_done() {
        let mut session = filled_session();
        let pending = session.begin_submit().expect("pending");

        assert!(session.is_loading());
        assert_eq!(session.visible_greeting(), None);
        assert_eq!(pending.request.features.len(), 14);

        session
            .finish_submit(pending.token, Ok(Lpa::from_hundredths(784)))
            .expect("finish");
        assert!(!session.is_loading());
        assert_eq!(
            session.visible_greeting(),
            Some("Hello Asha, calculating your predicted package...")
        );
    }

    #[test]
    fn second_submission_is_refused_while_in_flight() {
        let mut session = filled_session();
        let _pending = session.begin_submit().expect("pending");
        assert!(matches!(session.begin_submit(), Err(SubmitError::InFlight)));
    }

    #[test]
    fn transport_failure_clears_loading_without_prediction() {
        let mut session = filled_session();
        let pending = session.begin_submit().expect("pending");

        let error = session
            .finish_submit(pending.token, Err(TransportError::Interrupted))
            .expect_err("transport");
        assert_eq!(error.to_string(), "error connecting to backend");
        assert!(!session.is_loading());
        assert_eq!(session.prediction(), None);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn stale_token_does_not_settle_submission() {
        let mut session = filled_session();
        let pending = session.begin_submit().expect("pending");

        let error = session
            .finish_submit(pending.token + 1, Ok(Lpa::from_hundredths(100)))
            .expect_err("stale");
        assert!(matches!(error, SubmitError::StaleResponse));
        assert!(session.is_loading());
    }

    #[test]
    fn shown_result_blocks_resubmission_until_dismissed() {
        let mut session = filled_session();
        let pending = session.begin_submit().expect("pending");
        session
            .finish_submit(pending.token, Ok(Lpa::from_hundredths(1200)))
            .expect("finish");

        assert!(matches!(
            session.begin_submit(),
            Err(SubmitError::ResultShown)
        ));
    }

    #[test]
    fn dismiss_resets_form_greeting_and_prediction() {
        let mut session = filled_session();
        session.set(Attribute::Branch, "ECE").expect("branch");
        let pending = session.begin_submit().expect("pending");
        session
            .finish_submit(pending.token, Ok(Lpa::from_hundredths(650)))
            .expect("finish");

        assert!(session.dismiss());
        assert_eq!(session.name(), "");
        assert_eq!(session.form(), &CandidateForm::new());
        assert_eq!(session.value(Attribute::Branch), "CSE");
        assert_eq!(session.prediction(), None);
        assert_eq!(session.visible_greeting(), None);
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn dismiss_without_result_is_a_no_op() {
        let mut session = filled_session();
        assert!(!session.dismiss());
        assert_eq!(session.name(), "Asha");
    }
}
