//! Cake component — the cake canvas, its candles, and the click mapper.
//!
//! Drawn in the fixed 300×300 logical space (y down, like the silhouette
//! geometry); the canvas flips y since braille canvases grow upward. Clicks
//! inside the panel are scaled into logical space and offered to
//! `cake_core::surface`; accepted spots become `AddCandle` actions.

use ratatui::crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::Rect,
    symbols::Marker,
    widgets::canvas::{Canvas, Circle, Context, Line},
    Frame,
};

use cake_core::candles::Candle;
use cake_core::surface;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_CAKE_BODY, C_CAKE_OUTLINE, C_CANDLE, C_FLAME_CORE, C_FLAME_EDGE, C_PLATE},
};

pub struct Cake;

impl Cake {
    pub fn new() -> Self {
        Self
    }
}

impl Component for Cake {
    fn id(&self) -> ComponentId {
        ComponentId::Cake
    }

    fn handle_mouse(&mut self, event: MouseEvent, area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        // cell centers, so a click reads as the middle of its character cell
        let px = (event.column.saturating_sub(area.x)) as f64 + 0.5;
        let py = (event.row.saturating_sub(area.y)) as f64 + 0.5;
        let Some((x, y)) = surface::map_to_space(px, py, area.width as f64, area.height as f64)
        else {
            return vec![];
        };
        match surface::candle_spot(x, y) {
            Some((x, y)) => vec![Action::AddCandle { x, y }],
            None => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, surface::SPACE])
            .y_bounds([0.0, surface::SPACE])
            .paint(|ctx| {
                paint_body_fill(ctx);
                ctx.layer();
                paint_outline(ctx);
                for candle in state.cake.candles() {
                    paint_candle(ctx, candle, state.frame);
                }
            });
        frame.render_widget(canvas, area);
    }
}

/// Logical y (downward) → canvas y (upward).
fn cy(y: f64) -> f64 {
    surface::SPACE - y
}

fn line(ctx: &mut Context, x1: f64, y1: f64, x2: f64, y2: f64, color: ratatui::style::Color) {
    ctx.draw(&Line {
        x1,
        y1: cy(y1),
        x2,
        y2: cy(y2),
        color,
    });
}

fn quad_bezier(p0: (f64, f64), c: (f64, f64), p1: (f64, f64), t: f64) -> (f64, f64) {
    let u = 1.0 - t;
    (
        u * u * p0.0 + 2.0 * u * t * c.0 + t * t * p1.0,
        u * u * p0.1 + 2.0 * u * t * c.1 + t * t * p1.1,
    )
}

/// Soft horizontal fill between the top parabola and the cake bottom.
fn paint_body_fill(ctx: &mut Context) {
    let mut y = surface::CAKE_PEAK_Y + 8.0;
    while y < surface::CAKE_BOTTOM_Y {
        let half = (320.0 * (y - surface::CAKE_PEAK_Y)).sqrt();
        let xl = (surface::CAKE_CENTER_X - half).max(surface::CAKE_LEFT);
        let xr = (surface::CAKE_CENTER_X + half).min(surface::CAKE_RIGHT);
        if xr > xl {
            line(ctx, xl, y, xr, y, C_CAKE_BODY);
        }
        y += 5.0;
    }
}

fn paint_outline(ctx: &mut Context) {
    // side and bottom edges
    line(
        ctx,
        surface::CAKE_LEFT,
        surface::top_y(surface::CAKE_LEFT),
        surface::CAKE_LEFT,
        surface::CAKE_BOTTOM_Y,
        C_CAKE_OUTLINE,
    );
    line(
        ctx,
        surface::CAKE_RIGHT,
        surface::top_y(surface::CAKE_RIGHT),
        surface::CAKE_RIGHT,
        surface::CAKE_BOTTOM_Y,
        C_CAKE_OUTLINE,
    );
    line(
        ctx,
        surface::CAKE_LEFT,
        surface::CAKE_BOTTOM_Y,
        surface::CAKE_RIGHT,
        surface::CAKE_BOTTOM_Y,
        C_CAKE_OUTLINE,
    );

    // top edge: the silhouette parabola, sampled
    let mut prev = (surface::CAKE_LEFT, surface::top_y(surface::CAKE_LEFT));
    let mut x = surface::CAKE_LEFT + 4.0;
    while x <= surface::CAKE_RIGHT {
        let p = (x, surface::top_y(x));
        line(ctx, prev.0, prev.1, p.0, p.1, C_CAKE_OUTLINE);
        prev = p;
        x += 4.0;
    }

    // two scalloped decoration lines across the body
    for base in [180.0, 220.0] {
        paint_scallop(ctx, base);
    }

    // plate: shallow curve under the cake
    let p0 = (40.0, 250.0);
    let c = (150.0, 280.0);
    let p1 = (260.0, 250.0);
    let mut prev = p0;
    for i in 1..=16 {
        let p = quad_bezier(p0, c, p1, i as f64 / 16.0);
        line(ctx, prev.0, prev.1, p.0, p.1, C_PLATE);
        prev = p;
    }
}

/// One icing wave: two mirrored quadratic arcs from the left edge to the right.
fn paint_scallop(ctx: &mut Context, base: f64) {
    let segments = [
        ((surface::CAKE_LEFT, base), (110.0, base - 20.0), (150.0, base)),
        ((150.0, base), (190.0, base + 20.0), (surface::CAKE_RIGHT, base)),
    ];
    for (p0, c, p1) in segments {
        let mut prev = p0;
        for i in 1..=12 {
            let p = quad_bezier(p0, c, p1, i as f64 / 12.0);
            line(ctx, prev.0, prev.1, p.0, p.1, C_CAKE_OUTLINE);
            prev = p;
        }
    }
}

fn paint_candle(ctx: &mut Context, candle: &Candle, frame: u64) {
    let (x, base) = (candle.x, candle.y);
    let top = base - surface::CANDLE_HEIGHT;

    // body: thin filled column with an outline
    for dx in [-4.0, -2.0, 0.0, 2.0, 4.0] {
        line(ctx, x + dx, top, x + dx, base, C_CANDLE);
    }
    line(ctx, x - 5.0, top, x - 5.0, base, C_CAKE_OUTLINE);
    line(ctx, x + 5.0, top, x + 5.0, base, C_CAKE_OUTLINE);
    line(ctx, x - 5.0, top, x + 5.0, top, C_CAKE_OUTLINE);

    if candle.lit {
        // per-candle flicker, deterministic from the frame counter
        let j = frame
            .wrapping_mul(7)
            .wrapping_add(candle.id as u64 * 31)
            % 7;
        let sway = (j as f64 - 3.0) * 0.4;
        let breath = ((j % 3) as f64 - 1.0) * 0.6;

        ctx.draw(&Circle {
            x: x + sway * 0.5,
            y: cy(base - 45.0),
            radius: 6.5 + breath,
            color: C_FLAME_EDGE,
        });
        ctx.draw(&Circle {
            x: x + sway,
            y: cy(base - 42.0),
            radius: 2.8,
            color: C_FLAME_CORE,
        });
    }
}
