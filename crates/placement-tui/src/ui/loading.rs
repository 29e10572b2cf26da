use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};

use placement_core::payload::PredictionRequest;
use placement_core::prediction::Lpa;
use placement_core::predictor::{Predictor, TransportError};
use ratatui::Frame;
use ratatui::text::{Line, Text};

use crate::theme;
use crate::ui::modal::{ModalSpec, render_modal};

const FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

#[derive(Debug, Clone, Default)]
pub(crate) struct LoadingState {
    frame_index: usize,
}

impl LoadingState {
    pub(crate) fn next_frame(&mut self) {
        self.frame_index = (self.frame_index + 1) % FRAMES.len();
    }

    fn current_frame(&self) -> &'static str {
        FRAMES[self.frame_index]
    }
}

#[derive(Debug)]
pub(crate) struct PredictionDone {
    pub(crate) token: u64,
    pub(crate) outcome: Result<Lpa, TransportError>,
}

pub(crate) trait PredictionWorker: Send + Sync {
    fn spawn(&self, request: PredictionRequest, token: u64) -> Receiver<PredictionDone>;
}

pub(crate) struct ThreadPredictionWorker {
    predictor: Arc<dyn Predictor>,
}

impl ThreadPredictionWorker {
    pub(crate) fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }
}

impl PredictionWorker for ThreadPredictionWorker {
    fn spawn(&self, request: PredictionRequest, token: u64) -> Receiver<PredictionDone> {
        let (sender, receiver) = mpsc::channel();
        let predictor = Arc::clone(&self.predictor);
        std::thread::spawn(move || {
            let outcome = predictor.predict(&request);
            deliver(&sender, PredictionDone { token, outcome });
        });
        receiver
    }
}

fn deliver(sender: &Sender<PredictionDone>, done: PredictionDone) -> bool {
    match sender.send(done) {
        Ok(()) => true,
        Err(mpsc::SendError(lost)) => {
            tracing::debug!(
                token = lost.token,
                succeeded = lost.outcome.is_ok(),
                "prediction finished after the form stopped listening"
            );
            false
        }
    }
}

pub(crate) fn render_loading_modal(
    frame: &mut Frame<'_>,
    message: &str,
    key_hint: &str,
    loading: &LoadingState,
) {
    let body = Text::from(vec![
        Line::from(""),
        Line::from(format!("{} {}", loading.current_frame(), message)),
    ]);
    render_modal(
        frame,
        ModalSpec {
            title: "Predicting...",
            title_style: theme::focus_prompt(),
            body,
            key_hint,
            width_pct: 60,
            height_pct: 30,
        },
    );
}
