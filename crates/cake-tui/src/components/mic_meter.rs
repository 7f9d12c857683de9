//! Mic meter component — a one-row loudness strip with a threshold marker.
//!
//! Shows the live normalized level, flips to the accent color while the
//! blowing pulse is high, and falls back to a status hint when the
//! microphone is off or failed.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::{
    action::ComponentId,
    app_state::{AppState, MicStatus},
    component::Component,
    theme::{style_muted, C_METER_FILL, C_METER_HOT, C_METER_TRACK, C_SECONDARY},
};

/// Partial blocks for sub-cell precision on the bar tip.
const FRACTIONAL: [char; 7] = ['▏', '▎', '▍', '▌', '▋', '▊', '▉'];

pub struct MicMeter {
    /// Threshold the bar marker sits at; mirrors the detector config.
    pub threshold: f32,
}

impl MicMeter {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }
}

impl Component for MicMeter {
    fn id(&self) -> ComponentId {
        ComponentId::MicMeter
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let line = match &state.mic {
            MicStatus::Off => Line::from(Span::styled(
                " mic off · press m to listen, b to blow by hand",
                style_muted(),
            )),
            MicStatus::Starting => Line::from(Span::styled(
                " mic starting…",
                Style::default().fg(C_SECONDARY),
            )),
            MicStatus::Failed(reason) => Line::from(Span::styled(
                format!(" mic unavailable ({reason}) · click the cake, or b to blow"),
                style_muted(),
            )),
            MicStatus::Live { .. } => meter_line(state, self.threshold, area.width),
        };
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn meter_line(state: &AppState, threshold: f32, width: u16) -> Line<'static> {
    let label = if state.blowing { " breath! ≋ " } else { " mic ≋ " };
    let track_width = width
        .saturating_sub(label.chars().count() as u16 + 2)
        .min(48) as usize;
    if track_width == 0 {
        return Line::from(Span::raw(label.to_string()));
    }

    let fill_color = if state.blowing { C_METER_HOT } else { C_METER_FILL };
    let level = state.audio_level.clamp(0.0, 1.0);
    let cells = level * track_width as f32;
    let full = cells.floor() as usize;
    let frac = ((cells - cells.floor()) * 8.0) as usize;
    let marker = ((threshold.clamp(0.0, 1.0) * track_width as f32) as usize).min(track_width - 1);

    let mut spans = vec![Span::styled(
        label.to_string(),
        Style::default()
            .fg(if state.blowing { C_METER_HOT } else { C_SECONDARY })
            .add_modifier(if state.blowing {
                Modifier::BOLD
            } else {
                Modifier::empty()
            }),
    )];
    for i in 0..track_width {
        let (ch, color) = if i < full {
            ('█', fill_color)
        } else if i == full && frac > 0 {
            (FRACTIONAL[frac - 1], fill_color)
        } else if i == marker {
            ('│', C_SECONDARY)
        } else {
            ('░', C_METER_TRACK)
        };
        spans.push(Span::styled(ch.to_string(), Style::default().fg(color)));
    }
    Line::from(spans)
}
