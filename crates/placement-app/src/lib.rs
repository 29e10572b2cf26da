mod session;
mod settings;

use std::sync::Arc;

use anyhow::{Context, Result};
use placement_core::config::{ENDPOINT_ENV, resolve_config_path};
use placement_core::doctor::{DoctorReport, run_doctor};
use placement_core::prediction::Lpa;
use placement_core::predictor::{HttpPredictor, Predictor};

pub use session::{FormSession, PendingSubmission, Phase, SubmitError};
pub use settings::{Settings, resolve_settings};

pub struct App {
    predictor: Arc<dyn Predictor>,
}

impl App {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }

    pub fn from_environment(endpoint_flag: Option<&str>) -> Result<Self> {
        let config_path = resolve_config_path().context("failed to resolve config path")?;
        let environment = std::env::var(ENDPOINT_ENV).ok();
        let settings = resolve_settings(&config_path, endpoint_flag, environment.as_deref())?;
        Self::from_settings(&settings)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let predictor = HttpPredictor::new(settings.endpoint.clone(), settings.timeout)
            .with_context(|| format!("failed to prepare client for {}", settings.endpoint))?;
        Ok(Self::new(Arc::new(predictor)))
    }

    pub fn predictor(&self) -> Arc<dyn Predictor> {
        Arc::clone(&self.predictor)
    }

    pub fn doctor(endpoint_flag: Option<&str>) -> DoctorReport {
        run_doctor(endpoint_flag)
    }

    pub fn submit(&self, session: &mut FormSession) -> Result<Lpa, SubmitError> {
        let pending = session.begin_submit()?;
        let outcome = self.predictor.predict(&pending.request);
        session.finish_submit(pending.token, outcome)
    }
}
