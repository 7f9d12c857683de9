//! Counter component — the lit-candle tally pill, plus the relight prompt
//! once every flame is out. Clicking the pill while everything is out
//! relights the cake.

use ratatui::crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use cake_core::candles::MAX_CANDLES;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{style_accent, style_default, style_secondary, C_ACCENT},
};

pub struct Counter;

impl Counter {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Counter {
    fn id(&self) -> ComponentId {
        ComponentId::Counter
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        if event.kind == MouseEventKind::Down(MouseButton::Left) && state.cake.all_out() {
            return vec![Action::RelightAll];
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let line = if state.cake.all_out() {
            Line::from(Span::styled(
                "🎂 press r to light the candles again 🎂",
                style_accent(),
            ))
        } else {
            Line::from(vec![
                Span::styled("candles on the cake: ", style_default()),
                Span::styled(
                    format!("{}", state.lit_count()),
                    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" / {}", MAX_CANDLES), style_secondary()),
            ])
        };
        frame.render_widget(Paragraph::new(line).centered(), area);
    }
}
