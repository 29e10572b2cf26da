use placement_core::prediction::Lpa;
use placement_core::schema::{Attribute, Bound, FieldKind, NumberKind, choice_index};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use tui_input::Input;

use super::{FormFlow, Overlay, ROW_COUNT, Row, row_at};
use crate::theme;
use crate::ui::loading::render_loading_modal;
use crate::ui::modal::{ModalSpec, render_error_modal, render_modal, render_notice_modal};
use crate::ui::text::{
    compact_hint, dismiss_footer, focus_line, key_hint_height, key_hint_paragraph,
    wrapped_paragraph,
};

const LABEL_WIDTH: usize = 22;
const SLIDER_CELLS: i64 = 20;

impl FormFlow {
    pub(crate) fn render(&self, frame: &mut Frame<'_>) {
        let area = frame.area();
        let key_text = self.key_text(area.width);
        let footer_height = key_hint_height(area.width, key_text);
        let [header, body, greeting, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(6),
                Constraint::Length(1),
                Constraint::Length(footer_height),
            ])
            .areas(area);

        let header_text = Text::from(vec![
            Line::from("Placement Predictor"),
            focus_line("Fill in every field, then choose Predict"),
        ]);
        frame.render_widget(
            wrapped_paragraph(header_text).block(theme::chrome("Candidate")),
            header,
        );

        self.render_rows(frame, body);

        if let Some(message) = self.session.visible_greeting() {
            frame.render_widget(
                Paragraph::new(Span::styled(message.to_string(), theme::success_prompt())),
                greeting,
            );
        }

        frame.render_widget(
            key_hint_paragraph(key_text).block(theme::key_block()),
            footer,
        );

        self.render_overlays(frame);
    }

    fn render_rows(&self, frame: &mut Frame<'_>, area: Rect) {
        let items: Vec<ListItem<'_>> = (0..ROW_COUNT)
            .map(|index| ListItem::new(self.row_line(row_at(index))))
            .collect();
        let list = List::new(items)
            .block(theme::chrome(focus_line("Details")))
            .highlight_style(theme::row_highlight());

        let mut state = ListState::default();
        state.select(Some(self.focus));
        frame.render_stateful_widget(list, area, &mut state);

        if self.in_flight.is_some()
            || self.overlay.is_some()
            || self.session.prediction().is_some()
        {
            return;
        }

        let input = match self.focused_row() {
            Row::Name => Some(&self.name_input),
            Row::Field(attribute) => self.field_inputs.get(&attribute),
            Row::Submit => None,
        };
        if let Some(input) = input {
            let offset = state.offset();
            let line = self.focus.saturating_sub(offset) as u16;
            place_cursor(frame, area, line, input);
        }
    }

    fn row_line(&self, row: Row) -> Line<'static> {
        match row {
            Row::Name => labelled(
                "Name",
                text_value(self.name_input.value(), "your name"),
            ),
            Row::Field(attribute) => labelled(attribute.label(), self.field_value(attribute)),
            Row::Submit => {
                let label = if self.session.is_loading() {
                    "[ Predicting... ]"
                } else {
                    "[ Predict ]"
                };
                Line::from(Span::styled(
                    format!("{:LABEL_WIDTH$}{label}", ""),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
            }
        }
    }

    fn field_value(&self, attribute: Attribute) -> Vec<Span<'static>> {
        let value = self.session.value(attribute);
        match attribute.kind() {
            FieldKind::Numeric { number, bound } => {
                text_value(value, &numeric_placeholder(number, bound))
            }
            FieldKind::Categorical { choices } => {
                let label = choice_index(choices, value)
                    .map(|index| choices[index].label)
                    .unwrap_or(value);
                vec![Span::raw(format!("< {label} >"))]
            }
            FieldKind::Slider { min, max, default } => {
                let current = value.parse::<i64>().unwrap_or(default).clamp(min, max);
                let span = (max - min).max(1);
                let filled = ((current - min) * SLIDER_CELLS / span) as usize;
                let empty = SLIDER_CELLS as usize - filled;
                vec![Span::raw(format!(
                    "< [{}{}] {current} >",
                    "#".repeat(filled),
                    "-".repeat(empty)
                ))]
            }
        }
    }

    fn key_text(&self, width: u16) -> &'static str {
        if self.session.is_loading() {
            return compact_hint(
                width,
                "Waiting for the backend    Ctrl-C: quit",
                "Waiting    Ctrl-C: quit",
                "Ctrl-C quit",
            );
        }

        match self.focused_row() {
            Row::Submit => compact_hint(
                width,
                "Enter: predict    Up/Down/Tab: move    Esc: quit",
                "Enter: predict    Up/Down: move    Esc: quit",
                "Enter predict | Up/Down move | Esc quit",
            ),
            Row::Field(attribute) => match attribute.kind() {
                FieldKind::Categorical { .. } => compact_hint(
                    width,
                    "Left/Right: change    Enter: next    Up/Down/Tab: move    Esc: quit",
                    "Left/Right: change    Enter: next    Esc: quit",
                    "Left/Right change | Enter next | Esc quit",
                ),
                FieldKind::Slider { .. } => compact_hint(
                    width,
                    "Left/Right: -1/+1    PgDn/PgUp: -10/+10    Enter: next    Esc: quit",
                    "Left/Right: -1/+1    PgDn/PgUp: -10/+10    Esc: quit",
                    "Left/Right adjust | Enter next | Esc quit",
                ),
                FieldKind::Numeric { .. } => text_hint(width),
            },
            Row::Name => text_hint(width),
        }
    }

    fn render_overlays(&self, frame: &mut Frame<'_>) {
        let width = frame.area().width;

        if let Some(in_flight) = &self.in_flight {
            render_loading_modal(
                frame,
                "Contacting the prediction backend",
                "Ctrl-C: quit",
                &in_flight.loading,
            );
            return;
        }

        if let Some(lpa) = self.session.prediction() {
            render_result_modal(frame, self.session.name().trim(), lpa, dismiss_footer(width));
            return;
        }

        match &self.overlay {
            Some(Overlay::Invalid(message)) => render_notice_modal(
                frame,
                "Please fix the form",
                &format!("Cannot predict yet.\n\n{message}"),
                "Enter/Esc: back to form",
            ),
            Some(Overlay::Unreachable) => render_error_modal(
                frame,
                "Error connecting to backend\n\nYour answers are kept. Try again in a moment.",
                "Enter/Esc: back to form",
            ),
            None => {}
        }
    }
}

fn render_result_modal(frame: &mut Frame<'_>, name: &str, lpa: Lpa, footer: &str) {
    let title = format!("Congratulations {name}!");
    let body = Text::from(vec![
        Line::from(""),
        Line::from("Predicted Package:"),
        Line::from(Span::styled(
            format!("{lpa} LPA"),
            theme::success_prompt(),
        )),
    ]);
    render_modal(
        frame,
        ModalSpec {
            title: &title,
            title_style: theme::success_prompt(),
            body,
            key_hint: footer,
            width_pct: 60,
            height_pct: 36,
        },
    );
}

fn text_hint(width: u16) -> &'static str {
    compact_hint(
        width,
        "Type to edit    Enter: next    Up/Down/Tab: move    Esc: quit",
        "Type    Enter: next    Up/Down: move    Esc: quit",
        "Type | Enter next | Esc quit",
    )
}

fn labelled(label: &str, value: Vec<Span<'static>>) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("{label:LABEL_WIDTH$}"))];
    spans.extend(value);
    Line::from(spans)
}

fn text_value(value: &str, placeholder: &str) -> Vec<Span<'static>> {
    if value.is_empty() {
        vec![Span::styled(placeholder.to_string(), theme::secondary_text())]
    } else {
        vec![Span::raw(value.to_string())]
    }
}

fn numeric_placeholder(number: NumberKind, bound: Bound) -> String {
    let noun = match number {
        NumberKind::Decimal => "number",
        NumberKind::Count => "whole number",
    };
    match bound {
        Bound::AtLeast(min) => format!("{noun} >= {min}"),
        Bound::GreaterThan(min) => format!("{noun} > {min}"),
    }
}

fn place_cursor(frame: &mut Frame<'_>, list_area: Rect, line: u16, input: &Input) {
    let value_x = list_area.x + 1 + LABEL_WIDTH as u16;
    let right = list_area.x + list_area.width.saturating_sub(1);
    let y = list_area.y + 1 + line;
    if value_x >= right || y >= list_area.y + list_area.height.saturating_sub(1) {
        return;
    }

    let width = (right - value_x) as usize;
    let visual = input.visual_cursor().min(width.saturating_sub(1));
    frame.set_cursor_position((value_x + visual as u16, y));
}
