use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEvent};
use placement_core::schema::{Attribute, Choice, FieldKind, choice_index};
use tui_input::backend::crossterm::EventHandler;

use crate::keymap;

use super::{FlowSignal, FormFlow, ROW_COUNT, Row};

impl FormFlow {
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> Result<FlowSignal> {
        if self.overlay.is_some() {
            if keymap::is_confirm(key) || keymap::is_back(key) {
                self.overlay = None;
            }
            return Ok(FlowSignal::Continue);
        }

        if self.session.prediction().is_some() {
            if (keymap::is_confirm(key) || keymap::is_back(key)) && self.session.dismiss() {
                self.sync_inputs_from_session();
                self.focus = 0;
            }
            return Ok(FlowSignal::Continue);
        }

        if self.session.is_loading() {
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_back(key) {
            return Ok(FlowSignal::Exit);
        }

        if keymap::is_up(key) {
            self.focus = self.focus.saturating_sub(1);
            return Ok(FlowSignal::Continue);
        }

        if keymap::is_down(key) {
            self.advance_focus();
            return Ok(FlowSignal::Continue);
        }

        match self.focused_row() {
            Row::Submit => {
                if keymap::is_confirm(key) {
                    self.start_submit();
                }
            }
            Row::Name => {
                if keymap::is_confirm(key) {
                    self.advance_focus();
                } else if self.name_input.handle_event(&Event::Key(key)).is_some() {
                    self.session.set_name(self.name_input.value());
                }
            }
            Row::Field(attribute) => self.on_key_field(attribute, key)?,
        }

        Ok(FlowSignal::Continue)
    }

    fn on_key_field(&mut self, attribute: Attribute, key: KeyEvent) -> Result<()> {
        if keymap::is_confirm(key) {
            self.advance_focus();
            return Ok(());
        }

        let next = match attribute.kind() {
            FieldKind::Numeric { .. } => {
                let Some(input) = self.field_inputs.get_mut(&attribute) else {
                    return Ok(());
                };
                if input.handle_event(&Event::Key(key)).is_none() {
                    return Ok(());
                }
                input.value().to_string()
            }
            FieldKind::Categorical { choices } => {
                let step = if keymap::is_left(key) {
                    -1
                } else if keymap::is_right(key) {
                    1
                } else {
                    return Ok(());
                };
                cycle_choice(choices, self.session.value(attribute), step).to_string()
            }
            FieldKind::Slider { min, max, default } => {
                let step = if keymap::is_left(key) {
                    -1
                } else if keymap::is_right(key) {
                    1
                } else if let Some(step) = keymap::coarse_step(key) {
                    step
                } else {
                    return Ok(());
                };
                let current = self
                    .session
                    .value(attribute)
                    .parse::<i64>()
                    .unwrap_or(default);
                current.saturating_add(step).clamp(min, max).to_string()
            }
        };

        self.session
            .set(attribute, next)
            .with_context(|| format!("failed to update {attribute}"))
    }

    fn advance_focus(&mut self) {
        if self.focus + 1 < ROW_COUNT {
            self.focus += 1;
        }
    }
}

fn cycle_choice(choices: &'static [Choice], current: &str, step: isize) -> &'static str {
    if choices.is_empty() {
        return "";
    }
    let len = choices.len() as isize;
    let index = choice_index(choices, current).unwrap_or(0) as isize;
    choices[(index + step).rem_euclid(len) as usize].value
}
