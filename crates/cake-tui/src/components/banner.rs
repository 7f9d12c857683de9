//! Banner component — the greeting headline with pointer-proximity styling.
//!
//! Each character's color and weight scale with its distance to the pointer,
//! exponential falloff, so sweeping the mouse across the title makes the
//! letters flare up and settle back down.

use ratatui::crossterm::event::{KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{lerp_color, C_BANNER_DIM, C_BANNER_HOT, C_SECONDARY},
};

/// Pointer influence radius, in terminal cells.
const RADIUS: f32 = 24.0;

/// Terminal cells are roughly twice as tall as wide; weigh rows accordingly
/// so the glow looks circular on screen.
const ROW_ASPECT: f32 = 2.0;

pub struct Banner;

impl Banner {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Banner {
    fn id(&self) -> ComponentId {
        ComponentId::Banner
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        if area.height == 0 {
            return;
        }

        let title = format!("🎉 HAPPY BIRTHDAY {} 🎉", state.greeting_name);
        let title_row = area.y;
        let title_x = area
            .x
            .saturating_add((area.width.saturating_sub(title.width() as u16)) / 2);

        let spans = proximity_spans(&title, title_x, title_row, state.pointer);
        frame.render_widget(
            Paragraph::new(Line::from(spans)).centered(),
            Rect {
                height: 1,
                ..area
            },
        );

        if area.height >= 2 {
            let subtitle = "move the pointer over the title ✨";
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    subtitle,
                    Style::default().fg(C_SECONDARY),
                )))
                .centered(),
                Rect {
                    y: area.y + 2.min(area.height - 1),
                    height: 1,
                    ..area
                },
            );
        }
    }
}

/// Style every character of `text` by its distance to the pointer.
fn proximity_spans(
    text: &str,
    start_x: u16,
    row: u16,
    pointer: Option<(u16, u16)>,
) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(text.chars().count());
    let mut col = start_x as f32;

    for ch in text.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(1).max(1) as f32;
        let heat = match pointer {
            Some((px, py)) => {
                let dx = (col + w / 2.0) - px as f32;
                let dy = (row as f32 - py as f32) * ROW_ASPECT;
                let dist = (dx * dx + dy * dy).sqrt();
                (-dist / RADIUS).exp()
            }
            None => 0.0,
        };

        let mut style = Style::default().fg(lerp_color(C_BANNER_DIM, C_BANNER_HOT, heat));
        if heat > 0.45 {
            style = style.add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(ch.to_string(), style));
        col += w;
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn far_pointer_leaves_the_title_cold() {
        let spans = proximity_spans("HAPPY", 10, 2, Some((200, 50)));
        assert_eq!(spans.len(), 5);
        for span in &spans {
            assert!(!span.style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn near_pointer_emboldens_the_closest_characters() {
        let spans = proximity_spans("HAPPY", 10, 2, Some((12, 2)));
        assert!(spans
            .iter()
            .any(|s| s.style.add_modifier.contains(Modifier::BOLD)));
    }

    #[test]
    fn no_pointer_means_resting_style() {
        let spans = proximity_spans("HI", 0, 0, None);
        for span in &spans {
            assert_eq!(span.style.fg, Some(C_BANNER_DIM));
        }
    }
}
