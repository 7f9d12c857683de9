//! Color palette and style constants for the card.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(26, 16, 28);
pub const C_PRIMARY: Color = Color::Rgb(235, 220, 230);
pub const C_SECONDARY: Color = Color::Rgb(150, 125, 148);
pub const C_MUTED: Color = Color::Rgb(92, 74, 92);
pub const C_ACCENT: Color = Color::Rgb(255, 105, 160);

// Banner gradient endpoints: resting glow → pointer-heated.
pub const C_BANNER_DIM: Color = Color::Rgb(120, 70, 110);
pub const C_BANNER_HOT: Color = Color::Rgb(255, 214, 120);

pub const C_CAKE_BODY: Color = Color::Rgb(255, 192, 203);
pub const C_CAKE_OUTLINE: Color = Color::Rgb(214, 130, 160);
pub const C_PLATE: Color = Color::Rgb(168, 150, 170);
pub const C_CANDLE: Color = Color::Rgb(255, 165, 190);
pub const C_FLAME_CORE: Color = Color::Rgb(255, 215, 0);
pub const C_FLAME_EDGE: Color = Color::Rgb(255, 100, 30);

pub const C_METER_FILL: Color = Color::Rgb(140, 190, 255);
pub const C_METER_HOT: Color = Color::Rgb(255, 150, 190);
pub const C_METER_TRACK: Color = Color::Rgb(52, 40, 56);

pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);

pub const C_PANEL_BORDER: Color = Color::Rgb(56, 42, 60);

/// Pastel bubble shades, picked per bubble at spawn.
pub const C_BUBBLES: [Color; 5] = [
    Color::Rgb(90, 62, 92),
    Color::Rgb(116, 72, 104),
    Color::Rgb(132, 84, 116),
    Color::Rgb(104, 78, 122),
    Color::Rgb(88, 70, 110),
];

/// Confetti shades for the celebration overlay.
pub const C_CONFETTI: [Color; 6] = [
    Color::Rgb(255, 214, 90),
    Color::Rgb(255, 105, 160),
    Color::Rgb(140, 190, 255),
    Color::Rgb(120, 230, 160),
    Color::Rgb(230, 140, 255),
    Color::Rgb(255, 150, 100),
];

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_default() -> Style {
    Style::default().fg(C_PRIMARY)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_accent() -> Style {
    Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
}

/// Linear blend between two RGB colors, `t` in [0, 1].
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let ((ar, ag, ab), (br, bg, bb)) = match (a, b) {
        (Color::Rgb(ar, ag, ab), Color::Rgb(br, bg, bb)) => {
            ((ar as f32, ag as f32, ab as f32), (br as f32, bg as f32, bb as f32))
        }
        _ => return b,
    };
    Color::Rgb(
        (ar + (br - ar) * t).round() as u8,
        (ag + (bg - ag) * t).round() as u8,
        (ab + (bb - ab) * t).round() as u8,
    )
}
