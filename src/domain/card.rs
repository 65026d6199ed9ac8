/// The bingo card: a 5×5 grid of numbered cells.
///
/// Each cell carries two independent pieces of state:
///   - `marked`    : permanent. Set once by a correct pick, never cleared.
///   - `annotation`: transient. Drives the pick cooldown and is aged at
///                    every turn start (see `age_annotations`).

use rand::Rng;

pub const GRID_DIM: usize = 5;
pub const CELL_MAX: u32 = 100;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Annotation {
    #[default]
    Empty,
    Correct,
    Incorrect,  // wrong guess this turn
    Blocked,    // wrong guess last turn, still locked
}

impl Annotation {
    /// Can a cell with this annotation be picked?
    pub fn is_pickable(self) -> bool {
        matches!(self, Annotation::Empty)
    }

    /// One turn boundary: Incorrect → Blocked → Empty.
    pub fn aged(self) -> Self {
        match self {
            Annotation::Blocked => Annotation::Empty,
            Annotation::Incorrect => Annotation::Blocked,
            other => other,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    pub value: u32,
    pub marked: bool,
    pub annotation: Annotation,
}

impl Cell {
    pub fn new(value: u32) -> Self {
        Cell { value, marked: false, annotation: Annotation::Empty }
    }

    pub fn mark(&mut self) {
        self.marked = true;
    }
}

#[derive(Clone, Debug)]
pub struct Card {
    cells: [[Cell; GRID_DIM]; GRID_DIM],
}

impl Card {
    /// Fill every cell with an independent value in `1..=CELL_MAX`.
    /// Duplicates are allowed.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cells = [[Cell::new(1); GRID_DIM]; GRID_DIM];
        for row in cells.iter_mut() {
            for cell in row.iter_mut() {
                *cell = Cell::new(rng.random_range(1..=CELL_MAX));
            }
        }
        Card { cells }
    }

    /// Build a card from fixed values (all cells unmarked, EMPTY).
    #[cfg(test)]
    pub fn from_values(values: [[u32; GRID_DIM]; GRID_DIM]) -> Self {
        Card { cells: values.map(|row| row.map(Cell::new)) }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.cells.get(row)?.get(col)
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.cells.get_mut(row)?.get_mut(col)
    }

    pub fn is_marked(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).map_or(false, |c| c.marked)
    }

    pub fn rows(&self) -> &[[Cell; GRID_DIM]; GRID_DIM] {
        &self.cells
    }

    /// Turn-start cooldown step, applied to every cell.
    pub fn age_annotations(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            cell.annotation = cell.annotation.aged();
        }
    }
}
