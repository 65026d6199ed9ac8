/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back
///
/// Only a `BoardView` is drawn; the renderer knows nothing about dice
/// rules or turns.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::card::{Annotation, GRID_DIM};
use crate::sim::event::{ButtonLabel, CellView};
use super::view::{BoardView, TimerDisplay};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background for all "empty" terminal cells, so gaps
    /// between rows match the cell colour on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    fn new(ch: char, fg: Color, bg: Color) -> Self {
        let bg = match bg {
            Color::Reset => Self::BASE_BG,
            other => other,
        };
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }
}

// ── Layout ──

const TITLE_ROW: usize = 0;
const HUD_ROW: usize = 2;
const GRID_ROW: usize = 4;
const GRID_COL: usize = 2;
const CELL_W: usize = 7;    // "[ 100 ]"
const CELL_H: usize = 2;    // one text row + one spacer row

const TITLE_FG: Color = Color::Rgb { r: 255, g: 220, b: 50 };
const DIM_FG: Color = Color::Rgb { r: 120, g: 120, b: 140 };

fn cell_colors(annotation: Annotation) -> (Color, Color) {
    match annotation {
        Annotation::Empty => (Color::White, Color::Rgb { r: 50, g: 50, b: 70 }),
        Annotation::Correct => (Color::Black, Color::Rgb { r: 80, g: 200, b: 100 }),
        Annotation::Incorrect => (Color::White, Color::Rgb { r: 200, g: 60, b: 60 }),
        Annotation::Blocked => (DIM_FG, Color::Rgb { r: 35, g: 35, b: 45 }),
    }
}

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
        }
    }

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
        self.term_w = tw as usize;
        self.term_h = th as usize;
        self.front.resize(self.term_w, self.term_h);
        self.back.resize(self.term_w, self.term_h);
        // Force full repaint on first frame.
        self.back.cells.fill(Cell::INVALID);

        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, view: &BoardView) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        if tw as usize != self.term_w || th as usize != self.term_h {
            self.term_w = tw as usize;
            self.term_h = th as usize;
            self.front.resize(self.term_w, self.term_h);
            self.back.resize(self.term_w, self.term_h);
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        self.front.clear();
        self.compose_title();
        self.compose_hud(view);
        match &view.cells {
            Some(grid) => self.compose_grid(grid, view.cursor),
            None => self.front.put_str(GRID_COL, GRID_ROW, "Press P to start a game.", Color::White, Color::Reset),
        }
        self.compose_footer(view);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colours, not ResetColor (terminal default may differ).
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
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
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_title(&mut self) {
        self.front.put_str(GRID_COL, TITLE_ROW, "D I C E   B I N G O", TITLE_FG, Color::Reset);
    }

    fn compose_hud(&mut self, view: &BoardView) {
        let dice = match view.dice {
            Some((a, b)) => format!("Dice  [{:>2}]  [{:>2}]", a, b),
            None => "Dice  [  ]  [  ]".to_string(),
        };
        self.front.put_str(GRID_COL, HUD_ROW, &dice, Color::White, Color::Reset);

        let timer_fg = match view.timer {
            TimerDisplay::Bingo => TITLE_FG,
            TimerDisplay::Seconds(s) if s <= 5 => Color::Rgb { r: 255, g: 110, b: 80 },
            _ => Color::White,
        };
        let timer = format!("Time {}", view.timer_text());
        self.front.put_str(GRID_COL + 24, HUD_ROW, &timer, timer_fg, Color::Reset);
    }

    fn compose_grid(&mut self, grid: &[[CellView; GRID_DIM]; GRID_DIM], cursor: (usize, usize)) {
        for (r, row) in grid.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (fg, bg) = cell_colors(cell.annotation);
                let text = if (r, c) == cursor {
                    format!("[{:^5}]", cell.value)
                } else {
                    format!(" {:^5} ", cell.value)
                };
                self.front.put_str(GRID_COL + c * CELL_W, GRID_ROW + r * CELL_H, &text, fg, bg);
            }
        }
    }

    fn compose_footer(&mut self, view: &BoardView) {
        let y = GRID_ROW + GRID_DIM * CELL_H;
        let button = format!("[P] {}", view.button.as_str());
        let fg = if view.button == ButtonLabel::Start { TITLE_FG } else { Color::White };
        self.front.put_str(GRID_COL, y, &button, fg, Color::Reset);
        if view.is_paused() {
            self.front.put_str(GRID_COL + 16, y, "PAUSED", TITLE_FG, Color::Reset);
        }
        self.front.put_str(
            GRID_COL,
            y + 2,
            "Arrows/WASD: move   Space/Enter: pick   P: start/pause   Q: quit",
            DIM_FG,
            Color::Reset,
        );
    }
}
