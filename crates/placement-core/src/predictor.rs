use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

use crate::payload::PredictionRequest;
use crate::prediction::{Lpa, PredictionError, PredictionResponse};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("backend at {endpoint} responded with status {status}")]
    Status { endpoint: String, status: u16 },
    #[error("malformed prediction response: {message}")]
    Malformed { message: String },
    #[error("malformed prediction response: {0}")]
    Prediction(#[from] PredictionError),
    #[error("prediction worker exited without a response")]
    Interrupted,
}

pub trait Predictor: Send + Sync {
    fn predict(&self, request: &PredictionRequest) -> Result<Lpa, TransportError>;
}

#[derive(Debug, Clone)]
pub struct HttpPredictor {
    client: Client,
    endpoint: Url,
}

impl HttpPredictor {
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Self { client, endpoint })
    }
}

impl Predictor for HttpPredictor {
    fn predict(&self, request: &PredictionRequest) -> Result<Lpa, TransportError> {
        let endpoint = self.endpoint.to_string();
        tracing::debug!(
            %endpoint,
            features = request.features.len(),
            "sending prediction request"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .map_err(|source| TransportError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;
        let parsed: PredictionResponse =
            serde_json::from_str(&body).map_err(|error| TransportError::Malformed {
                message: error.to_string(),
            })?;
        let lpa = parsed.into_lpa()?;

        tracing::info!(%endpoint, %lpa, "prediction received");
        Ok(lpa)
    }
}
