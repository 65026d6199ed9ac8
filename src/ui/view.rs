/// Board view: what the player sees, rebuilt purely from session events.
///
/// The renderer never reads the session directly; it draws this struct.
/// The selection cursor is view-only state and maps a key press to the
/// `(row, col)` passed into `GameSession::pick`.

use crate::domain::card::{Annotation, GRID_DIM};
use crate::domain::matching::Outcome;
use crate::sim::event::{ButtonLabel, GameEvent, GridView};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerDisplay {
    Blank,
    Seconds(u32),
    Bingo,
}

pub struct BoardView {
    pub cells: Option<GridView>,
    pub dice: Option<(u32, u32)>,
    pub timer: TimerDisplay,
    pub button: ButtonLabel,
    pub cursor: (usize, usize),
}

impl BoardView {
    pub fn new() -> Self {
        BoardView {
            cells: None,
            dice: None,
            timer: TimerDisplay::Blank,
            button: ButtonLabel::Start,
            cursor: (0, 0),
        }
    }

    pub fn apply(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::CardRendered { cells } => self.cells = Some(cells),
            GameEvent::DiceShown { die0, die1 } => self.dice = Some((die0, die1)),
            GameEvent::TimerChanged { seconds_left } => self.timer = TimerDisplay::Seconds(seconds_left),
            GameEvent::CellOutcome { row, col, outcome } => {
                if let Some(cell) = self.cells.as_mut().and_then(|g| g.get_mut(row)?.get_mut(col)) {
                    cell.annotation = match outcome {
                        Outcome::Correct => Annotation::Correct,
                        Outcome::Incorrect => Annotation::Incorrect,
                    };
                }
            }
            GameEvent::Bingo => self.timer = TimerDisplay::Bingo,
            GameEvent::ButtonLabelChanged { label } => self.button = label,
        }
    }

    pub fn apply_all(&mut self, events: &[GameEvent]) {
        for e in events {
            self.apply(e);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.button == ButtonLabel::Resume
    }

    /// Move the cursor, clamped to the grid.
    pub fn move_cursor(&mut self, d_row: i32, d_col: i32) {
        let clamp = |v: usize, d: i32| (v as i32 + d).clamp(0, GRID_DIM as i32 - 1) as usize;
        self.cursor = (clamp(self.cursor.0, d_row), clamp(self.cursor.1, d_col));
    }

    pub fn timer_text(&self) -> String {
        match self.timer {
            TimerDisplay::Blank => String::new(),
            TimerDisplay::Seconds(s) => format_clock(s),
            TimerDisplay::Bingo => "BINGO!".to_string(),
        }
    }
}

/// `m:ss`, e.g. 0:30, 0:05, 1:00.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
