//! Celebration overlay — the "all candles out" banner and a confetti burst.
//!
//! The App dispatches [`Action::Celebrate`] when the lit count hits zero;
//! the overlay spawns its confetti then and animates it for as long as
//! `state.celebrating` stays true.

use rand::Rng;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Clear, Paragraph,
    },
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_CONFETTI, C_PRIMARY},
};

/// Virtual space for the confetti layer.
const SCENE: f64 = 100.0;
const CONFETTI_COUNT: usize = 50;

struct Confetti {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    color: usize,
}

pub struct CelebrationOverlay {
    confetti: Vec<Confetti>,
}

impl CelebrationOverlay {
    pub fn new() -> Self {
        Self {
            confetti: Vec::new(),
        }
    }

    /// Launch a fresh burst from the lower middle of the screen.
    fn burst(&mut self) {
        let mut rng = rand::thread_rng();
        self.confetti = (0..CONFETTI_COUNT)
            .map(|_| Confetti {
                x: rng.gen_range(35.0..65.0),
                y: rng.gen_range(15.0..30.0),
                vx: rng.gen_range(-1.4..1.4),
                vy: rng.gen_range(1.2..3.2),
                color: rng.gen_range(0..C_CONFETTI.len()),
            })
            .collect();
    }
}

impl Component for CelebrationOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::CelebrationOverlay
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if matches!(action, Action::Celebrate) {
            self.burst();
        }
        vec![]
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        if !state.celebrating {
            self.confetti.clear();
            return vec![];
        }
        for piece in &mut self.confetti {
            piece.x += piece.vx;
            piece.y += piece.vy;
            piece.vy -= 0.08; // arc over and fall
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if !state.celebrating {
            return;
        }

        // confetti behind the message, across the whole screen
        let coords_by_color: Vec<(usize, Vec<(f64, f64)>)> = (0..C_CONFETTI.len())
            .map(|ci| {
                (
                    ci,
                    self.confetti
                        .iter()
                        .filter(|p| p.color == ci)
                        .map(|p| (p.x, p.y))
                        .collect(),
                )
            })
            .collect();
        let canvas = Canvas::default()
            .marker(Marker::Dot)
            .x_bounds([0.0, SCENE])
            .y_bounds([0.0, SCENE])
            .paint(|ctx| {
                for (ci, coords) in &coords_by_color {
                    ctx.draw(&Points {
                        coords,
                        color: C_CONFETTI[*ci],
                    });
                }
            });
        frame.render_widget(canvas, area);

        // centered message box
        let height = 5u16.min(area.height);
        let box_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(height) / 2,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, box_area);

        let lines = vec![
            Line::from(Span::styled(
                "🎉  🎉  🎉",
                Style::default().fg(C_ACCENT),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("HAPPY BIRTHDAY {}!", state.greeting_name),
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "all candles blown out! make a wish 🎂",
                Style::default().fg(C_PRIMARY),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).centered(),
            box_area,
        );
    }
}
