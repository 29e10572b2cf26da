use std::collections::VecDeque;
use std::sync::Mutex;

use placement_app::FormSession;
use placement_core::payload::PredictionRequest;
use placement_core::prediction::Lpa;
use placement_core::predictor::{Predictor, TransportError};
use placement_core::schema::Attribute;

#[derive(Default)]
pub struct QueuePredictor {
    outcomes: Mutex<VecDeque<Result<Lpa, TransportError>>>,
    requests: Mutex<Vec<PredictionRequest>>,
}

impl QueuePredictor {
    pub fn new(outcomes: Vec<Result<Lpa, TransportError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<PredictionRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Predictor for QueuePredictor {
    fn predict(&self, request: &PredictionRequest) -> Result<Lpa, TransportError> {
        self.requests
            .lock()
            .expect("requests lock")
            .push(request.clone());

        self.outcomes
            .lock()
            .expect("outcomes lock")
            .pop_front()
            .unwrap_or(Err(TransportError::Interrupted))
    }
}

pub fn lpa(raw: f64) -> Lpa {
    Lpa::from_raw(raw).expect("valid lpa")
}

pub fn filled_session(name: &str) -> FormSession {
    let mut session = FormSession::new();
    session.set_name(name);
    for (attribute, value) in [
        (Attribute::Cgpa, "8.72"),
        (Attribute::Internships, "2"),
        (Attribute::Projects, "5"),
        (Attribute::CompetitiveRank, "340"),
        (Attribute::CodeforcesRating, "1820"),
        (Attribute::ExperienceMonths, "4"),
        (Attribute::Age, "21"),
        (Attribute::Grade10, "94.2"),
        (Attribute::Grade12, "89.6"),
        (Attribute::Backlogs, "0"),
    ] {
        session.set(attribute, value).expect("set attribute");
    }
    session
}
