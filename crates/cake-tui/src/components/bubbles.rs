//! Bubbles component — the floating background field.
//!
//! Thirty soft bubbles plus a sprinkle of one-dot particles drift upward on
//! every animation tick and respawn below the bottom edge. Pure per-frame
//! position updates, no physics.

use rand::Rng;
use ratatui::{
    layout::Rect,
    symbols::Marker,
    widgets::canvas::{Canvas, Circle, Points},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_BUBBLES, C_MUTED},
};

/// Virtual scene space for the background layer, both axes.
const SCENE: f64 = 100.0;
const BUBBLE_COUNT: usize = 30;
const PARTICLE_COUNT: usize = 50;

struct Bubble {
    x: f64,
    y: f64,
    radius: f64,
    speed: f64,
    color: usize,
}

struct Particle {
    x: f64,
    y: f64,
    speed: f64,
    sway: f64,
}

pub struct Bubbles {
    bubbles: Vec<Bubble>,
    particles: Vec<Particle>,
}

impl Bubbles {
    pub fn new() -> Self {
        let mut rng = rand::thread_rng();
        let bubbles = (0..BUBBLE_COUNT)
            .map(|_| Bubble {
                x: rng.gen_range(0.0..SCENE),
                y: rng.gen_range(0.0..SCENE),
                radius: rng.gen_range(1.5..6.0),
                speed: rng.gen_range(0.15..0.75),
                color: rng.gen_range(0..C_BUBBLES.len()),
            })
            .collect();
        let particles = (0..PARTICLE_COUNT)
            .map(|_| Particle {
                x: rng.gen_range(0.0..SCENE),
                y: rng.gen_range(0.0..SCENE),
                speed: rng.gen_range(0.05..0.25),
                sway: rng.gen_range(0.0..std::f64::consts::TAU),
            })
            .collect();
        Self { bubbles, particles }
    }
}

impl Component for Bubbles {
    fn id(&self) -> ComponentId {
        ComponentId::Bubbles
    }

    fn tick(&mut self, state: &AppState) -> Vec<Action> {
        let mut rng = rand::thread_rng();
        for bubble in &mut self.bubbles {
            bubble.y += bubble.speed;
            if bubble.y - bubble.radius > SCENE {
                bubble.y = -bubble.radius;
                bubble.x = rng.gen_range(0.0..SCENE);
            }
        }
        let phase = state.frame as f64 * 0.08;
        for particle in &mut self.particles {
            particle.y += particle.speed;
            particle.x += (phase + particle.sway).sin() * 0.12;
            if particle.y > SCENE {
                particle.y = 0.0;
                particle.x = rng.gen_range(0.0..SCENE);
            }
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _state: &AppState) {
        let canvas = Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, SCENE])
            .y_bounds([0.0, SCENE])
            .paint(|ctx| {
                for bubble in &self.bubbles {
                    ctx.draw(&Circle {
                        x: bubble.x,
                        y: bubble.y,
                        radius: bubble.radius,
                        color: C_BUBBLES[bubble.color],
                    });
                }
                ctx.layer();
                let dots: Vec<(f64, f64)> =
                    self.particles.iter().map(|p| (p.x, p.y)).collect();
                ctx.draw(&Points {
                    coords: &dots,
                    color: C_MUTED,
                });
            });
        frame.render_widget(canvas, area);
    }
}
