//! App — the component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries `AppMessage` events in from background tasks.
//! - The event loop draws each frame, then awaits the next message.
//! - Components return `Vec<Action>`; App dispatches each Action.
//! - The candle set is mutated only inside `dispatch`, and the celebration
//!   trigger observes the lit count in the same call — a blow pulse is fully
//!   applied before the next message or tick is processed.

use std::io;
use std::time::{Duration, Instant};

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::Style,
    widgets::Block,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use cake_core::celebration::Celebration;
use cake_core::config::Config;

use crate::audio::{AudioMonitor, AudioUpdate};
use crate::{
    action::Action,
    app_state::{AppState, MicStatus},
    component::Component,
    components::{
        banner::Banner, bubbles::Bubbles, cake::Cake, celebration::CelebrationOverlay,
        counter::Counter, help_overlay::HelpOverlay, mic_meter::MicMeter,
    },
    theme::C_BG,
    widgets::toast::ToastManager,
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    Audio(AudioUpdate),
}

/// Animation cadence for bubbles, flame flicker, and confetti.
const ANIM_FPS: u64 = 30;

// ── Pane area tracking ────────────────────────────────────────────────────────

/// Stores the last-drawn layout rects for the clickable panes.
/// Used by `handle_mouse` to do hit-testing without recomputing the layout.
#[derive(Default, Clone, Copy)]
struct PaneAreas {
    cake: Rect,
    counter: Rect,
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    config: Config,

    // ── Shared state (passed read-only to components) ─────────────────────────
    pub state: AppState,

    /// Celebration window state machine; observed on every candle mutation.
    celebration: Celebration,

    // ── Components ────────────────────────────────────────────────────────────
    banner: Banner,
    bubbles: Bubbles,
    cake: Cake,
    counter: Counter,
    mic_meter: MicMeter,
    celebration_overlay: CelebrationOverlay,
    help_overlay: HelpOverlay,

    // ── Session bookkeeping ───────────────────────────────────────────────────
    toast: ToastManager,
    monitor: Option<AudioMonitor>,
    /// Where capture threads report; set once at run() start so the monitor
    /// can be restarted with `m` at any time.
    audio_tx: Option<mpsc::Sender<AudioUpdate>>,

    /// Whether to quit on next iteration.
    should_quit: bool,

    /// Last-drawn layout rects — used for mouse hit-testing.
    pane_areas: PaneAreas,
}

impl App {
    pub fn new(config: Config) -> Self {
        let state = AppState::new(config.greeting.name.clone(), MicStatus::Off);
        let mic_meter = MicMeter::new(config.audio.blow_threshold);
        Self {
            config,
            state,
            celebration: Celebration::new(),
            banner: Banner::new(),
            bubbles: Bubbles::new(),
            cake: Cake::new(),
            counter: Counter::new(),
            mic_meter,
            celebration_overlay: CelebrationOverlay::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            monitor: None,
            audio_tx: None,
            should_quit: false,
            pane_areas: PaneAreas::default(),
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: audio updates → AppMessage ───────────────────────
        let (audio_tx, mut audio_rx) = mpsc::channel::<AudioUpdate>(256);
        let forward_tx = tx.clone();
        tokio::spawn(async move {
            while let Some(update) = audio_rx.recv().await {
                if forward_tx.send(AppMessage::Audio(update)).await.is_err() {
                    break;
                }
            }
        });
        self.audio_tx = Some(audio_tx);

        if self.config.audio.enabled {
            self.start_monitor();
        }

        info!("bday card ready ({} candles lit)", self.state.lit_count());

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut anim_tick = tokio::time::interval(Duration::from_millis(1000 / ANIM_FPS));
        anim_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // Toast expiry + lightweight maintenance
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    // Drain the queue, coalescing audio frames: only the most
                    // recent level matters for the meter.
                    const MAX_DRAIN: usize = 64;
                    let mut redraw = self.handle_message(msg);
                    let mut drained = 0usize;
                    let mut latest_frame: Option<AudioUpdate> = None;

                    while drained < MAX_DRAIN {
                        let next = match rx.try_recv() {
                            Ok(v) => v,
                            Err(_) => break,
                        };
                        drained += 1;
                        match next {
                            AppMessage::Audio(frame @ AudioUpdate::Frame { .. }) => {
                                latest_frame = Some(frame);
                            }
                            other => {
                                if let Some(frame) = latest_frame.take() {
                                    redraw |= self.handle_message(AppMessage::Audio(frame));
                                }
                                redraw |= self.handle_message(other);
                            }
                        }
                    }
                    if let Some(frame) = latest_frame {
                        redraw |= self.handle_message(AppMessage::Audio(frame));
                    }
                    needs_redraw = redraw;
                }

                _ = anim_tick.tick() => {
                    self.state.frame = self.state.frame.wrapping_add(1);
                    self.sync_celebration();
                    let tick_actions: Vec<Action> = {
                        let s = &self.state;
                        let mut all = Vec::new();
                        all.extend(self.bubbles.tick(s));
                        all.extend(self.celebration_overlay.tick(s));
                        all
                    };
                    for action in tick_actions {
                        self.dispatch(action);
                    }
                    needs_redraw = true;
                }

                _ = ui_tick.tick() => {
                    self.toast.tick();
                    needs_redraw = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        if let Some(mut monitor) = self.monitor.take() {
            monitor.stop();
        }
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    // ── Microphone lifecycle ──────────────────────────────────────────────────

    fn start_monitor(&mut self) {
        let Some(tx) = self.audio_tx.clone() else {
            return;
        };
        match AudioMonitor::spawn(
            self.config.audio.blow_threshold,
            self.config.audio.cooldown(),
            tx,
        ) {
            Ok(monitor) => {
                self.monitor = Some(monitor);
                self.state.mic = MicStatus::Starting;
            }
            Err(e) => {
                warn!("could not spawn mic thread: {e}");
                self.toast.error(format!("mic unavailable: {e}"));
                self.state.mic = MicStatus::Failed(e.to_string());
            }
        }
    }

    fn stop_monitor(&mut self) {
        if let Some(mut monitor) = self.monitor.take() {
            monitor.stop();
        }
        self.state.mic = MicStatus::Off;
        self.state.audio_level = 0.0;
        self.state.blowing = false;
    }

    // ── Message handler ───────────────────────────────────────────────────────

    /// Returns `true` if the message requires a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    let actions = self.handle_key(key);
                    for a in actions {
                        self.dispatch(a);
                    }
                    true
                }
                Event::Mouse(mouse) => {
                    let actions = self.handle_mouse(mouse);
                    for a in actions {
                        self.dispatch(a);
                    }
                    true
                }
                Event::Resize(w, h) => {
                    self.dispatch(Action::Resize(w, h));
                    true
                }
                _ => false,
            },

            AppMessage::Audio(update) => match update {
                AudioUpdate::Frame { level, blowing } => {
                    self.state.audio_level = level;
                    self.state.blowing = blowing;
                    true
                }
                AudioUpdate::Blow => {
                    self.dispatch(Action::Blow);
                    true
                }
                AudioUpdate::Started {
                    device,
                    sample_rate,
                } => {
                    info!("mic live: {device} @ {sample_rate} Hz");
                    self.toast.success("mic listening — blow out the candles!");
                    self.state.mic = MicStatus::Live {
                        device,
                        sample_rate,
                    };
                    true
                }
                AudioUpdate::Failed(reason) => {
                    // the capture thread already exited; reclaim the handle
                    self.monitor = None;
                    self.toast
                        .warning(format!("mic unavailable — click-only mode ({reason})"));
                    self.state.mic = MicStatus::Failed(reason);
                    self.state.audio_level = 0.0;
                    self.state.blowing = false;
                    true
                }
            },
        }
    }

    // ── Key / mouse routing ───────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        // an open help overlay consumes everything
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
            KeyCode::Char('?') => vec![Action::ToggleHelp],
            KeyCode::Char('r') => vec![Action::RelightAll],
            KeyCode::Char('b') => vec![Action::Blow],
            KeyCode::Char('m') => vec![Action::ToggleMic],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Action> {
        let at = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                self.state.pointer = Some((mouse.column, mouse.row));
                vec![]
            }
            MouseEventKind::Down(_) => {
                self.state.pointer = Some((mouse.column, mouse.row));
                if self.pane_areas.cake.contains(at) {
                    debug!("mouse down in {:?} at ({}, {})", self.cake.id(), at.x, at.y);
                    self.cake.handle_mouse(mouse, self.pane_areas.cake, &self.state)
                } else if self.pane_areas.counter.contains(at) {
                    debug!("mouse down in {:?}", self.counter.id());
                    self.counter
                        .handle_mouse(mouse, self.pane_areas.counter, &self.state)
                } else {
                    vec![]
                }
            }
            _ => vec![],
        }
    }

    // ── Action dispatch ───────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::AddCandle { x, y } => {
                if let Some(id) = self.state.cake.add(x, y) {
                    debug!("candle {id} placed at ({x:.0}, {y:.0})");
                    self.observe_candles();
                }
                // at the cap the click is silently ignored
            }

            Action::Blow => {
                let lit_before = self.state.cake.lit_count();
                let out = self.state.cake.blow(&mut rand::thread_rng());
                if out > 0 {
                    info!("breath! {out} of {lit_before} flames out");
                    self.observe_candles();
                }
            }

            Action::RelightAll => {
                self.state.cake.relight_all();
                info!("candles relit ({})", self.state.cake.len());
                self.observe_candles();
            }

            Action::Celebrate => {} // consumed by components below

            Action::ToggleHelp => {} // consumed by the help overlay below

            Action::ToggleMic => {
                if self.monitor.is_some() {
                    self.stop_monitor();
                    self.toast.info("mic stopped");
                } else {
                    self.start_monitor();
                }
            }

            Action::Quit => self.should_quit = true,

            Action::Resize(_, _) => {}
        }

        // let components react to the action
        let follow_ups: Vec<Action> = {
            let s = &self.state;
            let mut all = Vec::new();
            all.extend(self.help_overlay.on_action(&action, s));
            all.extend(self.celebration_overlay.on_action(&action, s));
            all
        };
        for a in follow_ups {
            self.dispatch(a);
        }
    }

    /// Re-derive the lit count after a candle mutation and feed the
    /// celebration trigger, before anything else can observe the state.
    fn observe_candles(&mut self) {
        let lit = self.state.cake.lit_count();
        let now = Instant::now();
        let fired = self.celebration.observe(lit, now);
        self.state.celebrating = self.celebration.active(now);
        if fired {
            info!("all {} candles out — celebration!", self.state.cake.len());
            self.dispatch(Action::Celebrate);
        }
    }

    fn sync_celebration(&mut self) {
        self.state.celebrating = self.celebration.active(Instant::now());
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        let area = frame.area();

        // Fill the terminal with the base background colour so unstyled cells
        // match the card rather than the terminal default.
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        // Background bubble field under everything else.
        self.bubbles.draw(frame, area, &self.state);

        // ── Outer layout: margin | banner | counter | gap | cake | meter ─────
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(8),
                Constraint::Length(1),
            ])
            .split(area);

        self.banner.draw(frame, outer[1], &self.state);
        self.counter.draw(frame, outer[2], &self.state);
        self.pane_areas.counter = outer[2];

        let cake_area = square_ish(outer[4]);
        self.cake.draw(frame, cake_area, &self.state);
        self.pane_areas.cake = cake_area;

        self.mic_meter.draw(frame, outer[5], &self.state);

        // ── Celebration overlay (on top of the card) ─────────────────────────
        if self.state.celebrating {
            self.celebration_overlay.draw(frame, area, &self.state);
        }

        // ── Help overlay + toasts (topmost layers) ───────────────────────────
        self.help_overlay.draw(frame, area, &self.state);
        self.toast.draw(frame, area);
    }
}

/// Center a visually square region inside `area`: terminal cells are about
/// twice as tall as wide, so "square" means width ≈ 2 × height.
fn square_ish(area: Rect) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let height = area.height.min((area.width / 2).max(1));
    let width = (height * 2).min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_ish_centers_and_keeps_cell_aspect() {
        let r = square_ish(Rect::new(0, 0, 100, 20));
        assert_eq!(r.height, 20);
        assert_eq!(r.width, 40);
        assert_eq!(r.x, 30);

        let narrow = square_ish(Rect::new(0, 0, 30, 40));
        assert_eq!(narrow.width, 30);
        assert_eq!(narrow.height, 15);
    }
}
