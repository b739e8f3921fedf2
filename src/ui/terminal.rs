//! Crossterm surface: clock, progress ring, controls and confetti

use std::{
    cell::RefCell,
    f64::consts::PI,
    io::{self, BufWriter, Stdout, Write},
    rc::Rc,
};
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use tracing::{debug, warn};

use super::{ControlAffordance, DurationInputs, Field, Surface, TimerView};
use crate::{
    services::celebration::{ConfettiField, CANVAS_HEIGHT, CANVAS_WIDTH},
    state::{StatusLabel, RING_CIRCUMFERENCE},
};

/// Number of cells the progress ring is drawn with
pub const RING_SEGMENTS: usize = 60;

const PALETTE: [Color; 6] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

const FADED_PALETTE: [Color; 6] = [
    Color::DarkRed,
    Color::DarkYellow,
    Color::DarkGreen,
    Color::DarkCyan,
    Color::DarkBlue,
    Color::DarkMagenta,
];

const HELP: &str = "space start/pause · r reset · tab switch field · q quit";

/// Raw mode and alternate screen for as long as the guard lives
#[derive(Debug)]
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        debug!("Terminal switched to raw mode");
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen) {
            warn!("Failed to leave alternate screen: {}", e);
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
    }
}

/// Number of ring cells lit for a given empty-arc offset
pub fn lit_segments(ring_offset: f64) -> usize {
    let visible = ((RING_CIRCUMFERENCE - ring_offset) / RING_CIRCUMFERENCE).clamp(0.0, 1.0);
    (visible * RING_SEGMENTS as f64).round() as usize
}

fn status_color(status: StatusLabel) -> Color {
    match status {
        StatusLabel::Ready => Color::Grey,
        StatusLabel::Focusing => Color::Green,
        StatusLabel::Paused => Color::Yellow,
        StatusLabel::Finished => Color::Magenta,
    }
}

/// Queue `text` at a cell, skipping anything that starts off screen
fn put<W: Write>(
    out: &mut W,
    size: (u16, u16),
    col: i32,
    row: i32,
    text: &str,
    color: Color,
) -> io::Result<()> {
    if col < 0 || row < 0 || col >= i32::from(size.0) || row >= i32::from(size.1) {
        return Ok(());
    }
    queue!(
        out,
        cursor::MoveTo(col as u16, row as u16),
        SetForegroundColor(color),
        Print(text),
        ResetColor,
    )
}

/// Column that centres `text` on `center`
fn centered(center: i32, text: &str) -> i32 {
    center - text.chars().count() as i32 / 2
}

/// Terminal implementation of the timer surface
pub struct TerminalSurface<W: Write> {
    out: W,
    size: (u16, u16),
    inputs: DurationInputs,
    confetti: Rc<RefCell<ConfettiField>>,
    last_view: Option<TimerView>,
}

impl TerminalSurface<BufWriter<Stdout>> {
    pub fn stdout(inputs: DurationInputs, confetti: Rc<RefCell<ConfettiField>>) -> Self {
        let size = terminal::size().unwrap_or((80, 24));
        Self::new(BufWriter::new(io::stdout()), size, inputs, confetti)
    }
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(
        out: W,
        size: (u16, u16),
        inputs: DurationInputs,
        confetti: Rc<RefCell<ConfettiField>>,
    ) -> Self {
        Self {
            out,
            size,
            inputs,
            confetti,
            last_view: None,
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) -> anyhow::Result<()> {
        self.size = (cols, rows);
        self.redraw()
    }

    /// Advance the confetti one frame; no-op once every particle is gone
    pub fn animate(&mut self) -> anyhow::Result<()> {
        if self.confetti.borrow().is_empty() {
            return Ok(());
        }
        self.confetti.borrow_mut().step();
        self.redraw()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn redraw(&mut self) -> anyhow::Result<()> {
        match self.last_view.take() {
            Some(view) => {
                let result = self.draw(&view);
                self.last_view = Some(view);
                result
            }
            None => Ok(()),
        }
    }

    fn draw(&mut self, view: &TimerView) -> anyhow::Result<()> {
        let size = self.size;
        let (cols, rows) = (i32::from(size.0), i32::from(size.1));
        let accent = if view.active { Color::Red } else { Color::DarkGrey };

        queue!(self.out, SetTitle(&view.title), Clear(ClearType::All))?;

        queue!(self.out, SetAttribute(Attribute::Bold))?;
        put(&mut self.out, size, centered(cols / 2, "FOCUS TIMER"), 0, "FOCUS TIMER", accent)?;
        queue!(self.out, SetAttribute(Attribute::Reset))?;

        // Ring, clockwise from twelve o'clock
        let radius_y = ((rows - 12) / 2).clamp(3, 9);
        let radius_x = radius_y * 2;
        let center_x = cols / 2;
        let center_y = 2 + radius_y;
        let lit = lit_segments(view.ring_offset);
        for k in 0..RING_SEGMENTS {
            let theta = -PI / 2.0 + 2.0 * PI * k as f64 / RING_SEGMENTS as f64;
            let col = center_x + (radius_x as f64 * theta.cos()).round() as i32;
            let row = center_y + (radius_y as f64 * theta.sin()).round() as i32;
            let (glyph, color) = if k < lit {
                ("●", if view.active { Color::Red } else { Color::Cyan })
            } else {
                ("·", Color::DarkGrey)
            };
            put(&mut self.out, size, col, row, glyph, color)?;
        }

        queue!(self.out, SetAttribute(Attribute::Bold))?;
        put(&mut self.out, size, centered(center_x, &view.clock), center_y - 1, &view.clock, Color::White)?;
        queue!(self.out, SetAttribute(Attribute::Reset))?;

        let status = view.status.text();
        put(&mut self.out, size, centered(center_x, status), center_y + 1, status, status_color(view.status))?;

        let below = center_y + radius_y + 2;
        let control = format!("[ {} {} ]", view.control.icon(), view.control.label());
        let control_color = match view.control {
            ControlAffordance::Pause => Color::Yellow,
            ControlAffordance::Start => Color::Green,
        };
        let buttons = format!("{}   [ ↺ Reset ]", control);
        let left = centered(center_x, &buttons);
        put(&mut self.out, size, left, below, &control, control_color)?;
        let reset_col = left + control.chars().count() as i32 + 3;
        put(&mut self.out, size, reset_col, below, "[ ↺ Reset ]", Color::Grey)?;

        self.draw_inputs(center_x, below + 2)?;
        put(&mut self.out, size, centered(center_x, HELP), below + 4, HELP, Color::DarkGrey)?;

        if let Some(last) = &view.last_action {
            put(&mut self.out, size, 1, rows - 1, &format!("last: {}", last), Color::DarkGrey)?;
        }

        self.draw_confetti()?;

        self.out.flush()?;
        Ok(())
    }

    fn draw_inputs(&mut self, center_x: i32, row: i32) -> anyhow::Result<()> {
        let minutes = format!("[{:<4}]", self.inputs.minutes);
        let seconds = format!("[{:<4}]", self.inputs.seconds);
        let line = format!("Minutes {}   Seconds {}", minutes, seconds);
        let mut col = centered(center_x, &line);

        for (label, value, field) in [
            ("Minutes ", minutes, Field::Minutes),
            ("   Seconds ", seconds, Field::Seconds),
        ] {
            put(&mut self.out, self.size, col, row, label, Color::Grey)?;
            col += label.chars().count() as i32;

            let focused = self.inputs.focus == field;
            if focused {
                queue!(self.out, SetAttribute(Attribute::Reverse))?;
            }
            put(&mut self.out, self.size, col, row, &value, Color::White)?;
            if focused {
                queue!(self.out, SetAttribute(Attribute::NoReverse))?;
            }
            col += value.chars().count() as i32;
        }
        Ok(())
    }

    fn draw_confetti(&mut self) -> anyhow::Result<()> {
        let confetti = Rc::clone(&self.confetti);
        let field = confetti.borrow();
        let (cols, rows) = (f32::from(self.size.0), f32::from(self.size.1));

        for particle in field.particles() {
            let col = (particle.x / CANVAS_WIDTH * cols) as i32;
            let row = (particle.y / CANVAS_HEIGHT * rows) as i32;
            let palette = if particle.life() < 0.3 { &FADED_PALETTE } else { &PALETTE };
            let color = palette[usize::from(particle.color) % palette.len()];
            let mut glyph = [0u8; 4];
            let large = particle.scalar > 1.0;
            if large {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
            put(&mut self.out, self.size, col, row, particle.glyph.encode_utf8(&mut glyph), color)?;
            if large {
                queue!(self.out, SetAttribute(Attribute::NormalIntensity))?;
            }
        }
        Ok(())
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn present(&mut self, view: &TimerView) -> anyhow::Result<()> {
        self.last_view = Some(view.clone());
        self.draw(view)
    }

    fn inputs(&self) -> &DurationInputs {
        &self.inputs
    }

    fn inputs_mut(&mut self) -> &mut DurationInputs {
        &mut self.inputs
    }
}
