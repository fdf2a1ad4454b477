//! Player — the live frame driver.
//!
//! Pumps frames at a fixed interval: clear the canvas, let the engine advance
//! and draw its wavefront, rasterize, and push the result to the terminal as a
//! full frame or a diff. Between frames it polls for key presses.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{cursor, event, execute, queue, style, terminal};
use tracing::{debug, info};

use crate::config::{AppConfig, matches_binding};
use crate::engine::{Engine, SceneParams};
use crate::menubar::print_menu_item;
use crate::renderer::{Canvas, Renderer};
use crate::types::{Cell, CellChange, Color, Frame, NamedColor, Style, TerminalContract};

/// Rows reserved above the canvas for the menu bar.
const CANVAS_OFFSET: u16 = 1;

/// Smallest terminal the player will run in.
pub const MIN_WIDTH: u16 = 20;
pub const MIN_HEIGHT: u16 = 8;

/// What the frame loop should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    /// Terminal contents are stale: redraw chrome and send a full frame.
    Redraw,
    Quit,
}

pub struct Player {
    config: AppConfig,
    engine: Engine,
    canvas: Canvas,
    renderer: Renderer,
    term_height: u16,
    paused: bool,
}

impl Player {
    /// Set up a player for a terminal of `(width, height)` cells.
    pub fn new(config: AppConfig, (width, height): (u16, u16)) -> Result<Self> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                MIN_WIDTH,
                MIN_HEIGHT,
                width,
                height,
            );
        }

        // +2: one row for menu bar, one row for status bar
        let canvas_height = height - 2;
        let params = SceneParams {
            dot_count: config.dot_count,
            max_radius: config.radius_for(canvas_height),
        };
        let engine = Engine::build(config.scene, params);

        Ok(Self {
            config,
            engine,
            canvas: Canvas::new(width, canvas_height),
            renderer: Renderer::new(TerminalContract {
                width,
                height: canvas_height,
            }),
            term_height: height,
            paused: false,
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Run in the terminal until the user quits.
    ///
    /// Sets up the terminal, enters the frame loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode().context("Failed to enable raw mode")?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;
        info!(scene = ?self.engine.kind(), "playback started");

        let result = self.run_loop(&mut stdout);

        // Always restore terminal state.
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        info!(frames = self.engine.scheduler().frames_ticked(), "playback stopped");

        result
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, out: &mut impl Write) -> Result<()> {
        let interval = Duration::from_millis(self.config.frame_interval_ms);
        let mut next_frame = Instant::now();

        self.render_menubar(out)?;

        loop {
            let now = Instant::now();
            if now >= next_frame {
                if !self.paused {
                    self.step(out)?;
                }
                next_frame += interval;
                // Running behind: skip ahead rather than bursting frames.
                if next_frame < now {
                    next_frame = now + interval;
                }
            }

            let timeout = next_frame.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                match self.handle_event(event::read()?) {
                    Action::Continue => {}
                    Action::Redraw => {
                        queue!(out, terminal::Clear(terminal::ClearType::All))?;
                        self.render_menubar(out)?;
                    }
                    Action::Quit => break,
                }
            }
        }

        Ok(())
    }

    /// Translate one input event into engine commands.
    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                let bindings = &self.config.key_bindings;
                if matches_binding(&bindings.quit, &key)
                    || key.code == KeyCode::Esc
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL))
                {
                    Action::Quit
                } else if matches_binding(&bindings.restart, &key) {
                    self.engine.restart();
                    Action::Continue
                } else if matches_binding(&bindings.pause, &key) {
                    self.paused = !self.paused;
                    debug!(paused = self.paused, "pause toggled");
                    Action::Continue
                } else {
                    Action::Continue
                }
            }
            Event::Resize(width, height) => {
                self.resize(width, height);
                Action::Redraw
            }
            _ => Action::Continue,
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let canvas_height = height.saturating_sub(2);
        debug!(width, height, "terminal resized");
        self.term_height = height;
        self.canvas.resize(width, canvas_height);
        self.renderer.resize(TerminalContract {
            width,
            height: canvas_height,
        });
    }

    /// Advance the scene one frame and write it out.
    pub fn step(&mut self, out: &mut impl Write) -> Result<()> {
        self.canvas.clear();
        let wavefront = self.engine.frame(&mut self.canvas);
        if let Some(caption) = self.engine.caption() {
            let hud = Style {
                fg: Some(self.config.hud_color),
                ..Default::default()
            };
            self.canvas.overlay_text(&caption, 2, 1, hud);
        }

        let scene = self.canvas.take_scene();
        match self.renderer.render(&scene) {
            Frame::Full { cells } => self.render_full(out, &cells)?,
            Frame::Diff { changes } => self.render_diff(out, &changes)?,
        }
        self.render_status(out, wavefront)?;
        out.flush()?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn render_menubar(&self, out: &mut impl Write) -> Result<()> {
        let bindings = &self.config.key_bindings;
        let items = [
            format!("[{}] restart", bindings.restart),
            format!("[{}] pause", bindings.pause),
            format!("[{}][Esc] quit", bindings.quit),
        ];

        queue!(
            out,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                queue!(out, style::Print("  "))?;
            }
            print_menu_item(out, item)?;
        }
        out.flush()?;
        Ok(())
    }

    fn render_full(&self, out: &mut impl Write, grid: &[Vec<Cell>]) -> Result<()> {
        for (y, row) in grid.iter().enumerate() {
            queue!(out, cursor::MoveTo(0, y as u16 + CANVAS_OFFSET))?;
            for cell in row {
                let cs = to_content_style(&cell.style);
                queue!(
                    out,
                    style::PrintStyledContent(style::StyledContent::new(cs, cell.ch))
                )?;
            }
        }
        Ok(())
    }

    fn render_diff(&self, out: &mut impl Write, changes: &[CellChange]) -> Result<()> {
        for change in changes {
            let cs = to_content_style(&change.cell.style);
            queue!(
                out,
                cursor::MoveTo(change.x, change.y + CANVAS_OFFSET),
                style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
            )?;
        }
        Ok(())
    }

    fn render_status(&self, out: &mut impl Write, wavefront: usize) -> Result<()> {
        let status_y = self.renderer.contract().height + CANVAS_OFFSET;
        if status_y >= self.term_height {
            return Ok(()); // No room for status bar.
        }

        let scheduler = self.engine.scheduler();
        let status = format!(
            " Frame {} | gate: {} | active {}/{}: {}{} ",
            scheduler.frames_ticked(),
            scheduler.gate(),
            wavefront,
            scheduler.len(),
            self.engine.active_units().join(", "),
            if self.paused { " | paused" } else { "" },
        );

        let mut cs = style::ContentStyle::default();
        cs.attributes.set(style::Attribute::Dim);

        queue!(
            out,
            cursor::MoveTo(0, status_y),
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::PrintStyledContent(style::StyledContent::new(cs, status)),
        )?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    if s.dim {
        cs.attributes.set(style::Attribute::Dim);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}
