mod keys;
mod render;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

use placement_app::{App, FormSession, SubmitError};
use placement_core::predictor::TransportError;
use placement_core::schema::{ATTRIBUTES, Attribute, FieldKind};
use tui_input::Input;

use crate::ui::loading::{LoadingState, PredictionDone, PredictionWorker, ThreadPredictionWorker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FlowSignal {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Name,
    Field(Attribute),
    Submit,
}

const ROW_COUNT: usize = ATTRIBUTES.len() + 2;

fn row_at(index: usize) -> Row {
    match index {
        0 => Row::Name,
        index if index <= ATTRIBUTES.len() => Row::Field(ATTRIBUTES[index - 1]),
        _ => Row::Submit,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Overlay {
    Invalid(String),
    Unreachable,
}

struct InFlight {
    token: u64,
    receiver: Receiver<PredictionDone>,
    loading: LoadingState,
}

pub(crate) struct FormFlow {
    session: FormSession,
    worker: Arc<dyn PredictionWorker>,
    focus: usize,
    name_input: Input,
    field_inputs: BTreeMap<Attribute, Input>,
    overlay: Option<Overlay>,
    in_flight: Option<InFlight>,
}

impl FormFlow {
    pub(crate) fn new(app: &App) -> Self {
        Self::new_with_worker(Arc::new(ThreadPredictionWorker::new(app.predictor())))
    }

    fn new_with_worker(worker: Arc<dyn PredictionWorker>) -> Self {
        let mut flow = Self {
            session: FormSession::new(),
            worker,
            focus: 0,
            name_input: Input::default(),
            field_inputs: BTreeMap::new(),
            overlay: None,
            in_flight: None,
        };
        flow.sync_inputs_from_session();
        flow
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    fn focused_row(&self) -> Row {
        row_at(self.focus)
    }

    fn sync_inputs_from_session(&mut self) {
        self.name_input = Input::new(self.session.name().to_string());
        self.field_inputs = ATTRIBUTES
            .iter()
            .filter(|attribute| matches!(attribute.kind(), FieldKind::Numeric { .. }))
            .map(|attribute| {
                (
                    *attribute,
                    Input::new(self.session.value(*attribute).to_string()),
                )
            })
            .collect();
    }

    pub(crate) fn on_tick(&mut self) {
        let Some(in_flight) = &mut self.in_flight else {
            return;
        };
        in_flight.loading.next_frame();

        let token = in_flight.token;
        let done = match in_flight.receiver.try_recv() {
            Ok(done) => done,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => PredictionDone {
                token,
                outcome: Err(TransportError::Interrupted),
            },
        };
        self.in_flight = None;

        let settled = match self.session.finish_submit(done.token, done.outcome) {
            Err(SubmitError::StaleResponse) => self
                .session
                .finish_submit(token, Err(TransportError::Interrupted)),
            other => other,
        };

        if let Err(error) = settled {
            tracing::debug!(%error, "prediction did not produce a result");
            self.overlay = Some(Overlay::Unreachable);
        }
    }

    fn start_submit(&mut self) {
        match self.session.begin_submit() {
            Ok(pending) => {
                let receiver = self.worker.spawn(pending.request, pending.token);
                self.in_flight = Some(InFlight {
                    token: pending.token,
                    receiver,
                    loading: LoadingState::default(),
                });
            }
            Err(error) => {
                self.overlay = Some(Overlay::Invalid(error.to_string()));
            }
        }
    }
}
