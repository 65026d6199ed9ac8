/// Notifications emitted by the session.
/// The presentation layer consumes these to redraw; they carry data only.

use crate::domain::card::{Annotation, Card, GRID_DIM};
use crate::domain::matching::Outcome;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CellView {
    pub value: u32,
    pub annotation: Annotation,
}

pub type GridView = [[CellView; GRID_DIM]; GRID_DIM];

pub fn grid_view(card: &Card) -> GridView {
    card.rows().map(|row| row.map(|c| CellView { value: c.value, annotation: c.annotation }))
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ButtonLabel {
    Start,
    Pause,
    Resume,
}

impl ButtonLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ButtonLabel::Start => "Start",
            ButtonLabel::Pause => "Pause",
            ButtonLabel::Resume => "Resume",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    CardRendered { cells: GridView },
    DiceShown { die0: u32, die1: u32 },
    TimerChanged { seconds_left: u32 },
    CellOutcome { row: usize, col: usize, outcome: Outcome },
    Bingo,
    ButtonLabelChanged { label: ButtonLabel },
}
