//! Double-buffered, diff-based terminal backend
//!
//! Implements [`Canvas`] by quantizing pixel-space draw calls onto a
//! character grid: one maze tile is two terminal columns by one row.
//! Each frame is composed into a front buffer, diffed against the
//! previous frame and only changed cells are written out, batched with
//! `queue!` and flushed once. This keeps full-screen redraw flicker out
//! of slower terminals.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use glam::{Vec2, Vec3};
use unicode_width::UnicodeWidthChar;

use super::Canvas;
use crate::consts::TILE_PIXELS;
use crate::settings::GlyphPreset;

/// One maze tile maps to this many terminal columns (and one row)
const CELL_W: i32 = 2;
const PX_PER_COL: f32 = TILE_PIXELS / CELL_W as f32;
const PX_PER_ROW: f32 = TILE_PIXELS;

/// Terminal footprint of the full board
pub const BOARD_COLS: u16 = (crate::consts::MAZE_WIDTH * CELL_W) as u16;
pub const BOARD_ROWS: u16 = crate::consts::MAZE_HEIGHT as u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell, so inter-row gap pixels
    /// match on VTE-based terminals
    const BASE_BG: Color = Color::Rgb { r: 8, g: 8, b: 24 };

    const BLANK: Cell = Cell {
        ch: ' ',
        fg: Color::White,
        bg: Cell::BASE_BG,
    };

    /// Differs from any real cell, so filling the back buffer with it
    /// forces a full repaint
    const INVALID: Cell = Cell {
        ch: '?',
        fg: Color::Magenta,
        bg: Color::Magenta,
    };
}

struct FrameBuffer {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; (width * height) as usize],
        }
    }

    fn resize(&mut self, width: i32, height: i32) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.cells = vec![Cell::BLANK; (width * height) as usize];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        (col >= 0 && col < self.width && row >= 0 && row < self.height)
            .then(|| (row * self.width + col) as usize)
    }

    fn get(&self, col: i32, row: i32) -> Cell {
        self.index(col, row)
            .map_or(Cell::BLANK, |i| self.cells[i])
    }

    /// Replace the glyph, keeping whatever background is already there
    fn set_glyph(&mut self, col: i32, row: i32, ch: char, fg: Color) {
        if let Some(i) = self.index(col, row) {
            self.cells[i].ch = ch;
            self.cells[i].fg = fg;
        }
    }

    /// Flood the cell with a background color, erasing the glyph
    fn set_bg(&mut self, col: i32, row: i32, bg: Color) {
        if let Some(i) = self.index(col, row) {
            self.cells[i].ch = ' ';
            self.cells[i].bg = bg;
        }
    }
}

/// Crossterm-backed renderer; the board anchors at the top-left corner
pub struct TerminalRenderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: i32,
    term_h: i32,
    glyphs: GlyphPreset,
    high_contrast: bool,
}

impl TerminalRenderer {
    pub fn new(glyphs: GlyphPreset, high_contrast: bool) -> Self {
        Self {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            glyphs,
            high_contrast,
        }
    }

    /// Enter raw mode and the alternate screen
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.term_w = tw as i32;
        self.term_h = th as i32;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    /// Restore the terminal. Safe to call after a failed init.
    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Start a frame: pick up terminal resizes and blank the front buffer
    pub fn begin_frame(&mut self) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as i32 != self.term_w || th as i32 != self.term_h {
            self.term_w = tw as i32;
            self.term_h = th as i32;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(
                self.writer,
                SetBackgroundColor(Cell::BASE_BG),
                Clear(ClearType::All)
            )?;
        }
        self.front.clear();
        Ok(())
    }

    /// Emit the diff against the previous frame, then swap buffers
    pub fn present(&mut self) -> io::Result<()> {
        if self.term_w < BOARD_COLS as i32 || self.term_h < BOARD_ROWS as i32 {
            let notice = format!("Terminal too small: need {}x{}", BOARD_COLS, BOARD_ROWS);
            for (i, ch) in notice.chars().enumerate() {
                self.front.set_glyph(i as i32, 0, ch, Color::White);
            }
        }

        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_col = 0;
        let mut last_row = 0;

        queue!(
            self.writer,
            SetForegroundColor(last_fg),
            SetBackgroundColor(last_bg)
        )?;

        for row in 0..self.front.height {
            for col in 0..self.front.width {
                let cell = self.front.get(col, row);
                if cell == self.back.get(col, row) {
                    need_move = true;
                    continue;
                }

                if need_move || col != last_col + 1 || row != last_row {
                    queue!(self.writer, MoveTo(col as u16, row as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                last_col = col;
                last_row = row;
            }
        }

        self.writer.flush()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn color(&self, color: Vec3) -> Color {
        // High contrast lifts every channel halfway to full
        let v = if self.high_contrast {
            color * 0.5 + Vec3::splat(0.5)
        } else {
            color
        };
        Color::Rgb {
            r: (v.x.clamp(0.0, 1.0) * 255.0) as u8,
            g: (v.y.clamp(0.0, 1.0) * 255.0) as u8,
            b: (v.z.clamp(0.0, 1.0) * 255.0) as u8,
        }
    }

    /// Background-fill the cells overlapping a square of the given half
    /// extent around `center` (pixels)
    fn fill_blob(&mut self, center: Vec2, half: f32, bg: Color) {
        let col0 = ((center.x - half) / PX_PER_COL).floor() as i32;
        let col1 = ((center.x + half) / PX_PER_COL).floor() as i32;
        let row0 = ((center.y - half) / PX_PER_ROW).floor() as i32;
        let row1 = ((center.y + half) / PX_PER_ROW).floor() as i32;
        for row in row0..=row1 {
            for col in col0..=col1 {
                self.front.set_bg(col, row, bg);
            }
        }
    }
}

fn col_of(px: f32) -> i32 {
    (px / PX_PER_COL).floor() as i32
}

fn row_of(py: f32) -> i32 {
    (py / PX_PER_ROW).floor() as i32
}

/// Glyph for the player's mouth, facing the opening toward travel
fn mouth_glyph(rotation: f32, mouth_angle: f32) -> char {
    let open = mouth_angle > 22.5;
    match rotation as i32 {
        90 => {
            if open {
                '^'
            } else {
                '|'
            }
        }
        180 => {
            if open {
                '>'
            } else {
                '-'
            }
        }
        270 => {
            if open {
                'V'
            } else {
                '|'
            }
        }
        _ => {
            if open {
                '<'
            } else {
                '-'
            }
        }
    }
}

impl Canvas for TerminalRenderer {
    fn fill_rect(&mut self, pos: Vec2, size: Vec2, color: Vec3) {
        let color = self.color(color);
        if size.x >= TILE_PIXELS - 0.5 || size.y >= TILE_PIXELS - 0.5 {
            // Tile-sized and larger rects flood their cells
            let col1 = col_of(pos.x + size.x - 0.5);
            let row1 = row_of(pos.y + size.y - 0.5);
            for row in row_of(pos.y)..=row1 {
                for col in col_of(pos.x)..=col1 {
                    self.front.set_bg(col, row, color);
                }
            }
        } else {
            // Sub-tile rects (particles) collapse to one spark glyph
            let ch = match self.glyphs {
                GlyphPreset::Ascii => '*',
                GlyphPreset::Unicode => '▪',
            };
            let center = pos + size * 0.5;
            self.front
                .set_glyph(col_of(center.x), row_of(center.y), ch, color);
        }
    }

    fn rect_outline(&mut self, _pos: Vec2, _size: Vec2, _color: Vec3, _thickness: f32) {
        // A two-pixel outline is below cell resolution
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Vec3) {
        let color = self.color(color);
        if radius >= 12.0 {
            self.fill_blob(center, radius * std::f32::consts::FRAC_1_SQRT_2, color);
        } else {
            let ch = match (self.glyphs, radius >= 5.0) {
                (GlyphPreset::Ascii, true) => 'o',
                (GlyphPreset::Ascii, false) => '.',
                (GlyphPreset::Unicode, true) => '●',
                (GlyphPreset::Unicode, false) => '·',
            };
            self.front
                .set_glyph(col_of(center.x), row_of(center.y), ch, color);
        }
    }

    fn wedge(&mut self, center: Vec2, radius: f32, rotation: f32, mouth_angle: f32, color: Vec3) {
        let body = self.color(color);
        self.fill_blob(center, radius * std::f32::consts::FRAC_1_SQRT_2, body);
        self.front.set_glyph(
            col_of(center.x),
            row_of(center.y),
            mouth_glyph(rotation, mouth_angle),
            Color::Black,
        );
    }

    fn text(&mut self, pos: Vec2, text: &str, _scale: f32, color: Vec3) {
        let color = self.color(color);
        let row = row_of(pos.y);
        let mut col = col_of(pos.x);
        for ch in text.chars() {
            let width = ch.width().unwrap_or(0) as i32;
            if width == 0 {
                continue;
            }
            self.front.set_glyph(col, row, ch, color);
            col += width;
        }
    }
}
