/// Turn controller: one dice roll, a countdown, and a handful of picks.
///
/// Turn start sequence (always in this order):
///   1. Age card annotations (Incorrect → Blocked → Empty)
///   2. Roll a fresh DiceSet
///   3. Reset picks and countdown
///
/// The first `busy_ticks` countdown values of a turn reject picks so the
/// dice are on screen before input opens. A turn never fails: when the
/// countdown reaches zero the next turn starts, whatever picks remain.

use rand::Rng;
use tracing::{debug, trace};

use crate::config::TurnConfig;
use crate::domain::card::Card;
use crate::domain::dice::DiceSet;
use crate::domain::matching::{self, Outcome};
use super::event::{grid_view, GameEvent};

#[derive(Clone, Debug)]
pub struct Turn {
    pub dice: DiceSet,
    pub picks_left: u32,
    pub seconds_left: u32,
}

pub struct TurnController {
    rules: TurnConfig,
    turn: Option<Turn>,
}

impl TurnController {
    pub fn new(rules: TurnConfig) -> Self {
        TurnController { rules, turn: None }
    }

    pub fn rules(&self) -> &TurnConfig {
        &self.rules
    }

    #[cfg(test)]
    pub fn turn(&self) -> Option<&Turn> {
        self.turn.as_ref()
    }

    #[cfg(test)]
    pub fn turn_mut(&mut self) -> Option<&mut Turn> {
        self.turn.as_mut()
    }

    /// Start a turn with freshly rolled dice.
    pub fn begin<R: Rng + ?Sized>(&mut self, card: &mut Card, rng: &mut R, events: &mut Vec<GameEvent>) {
        self.begin_with(card, DiceSet::roll(rng), events);
    }

    /// Start a turn with the given dice.
    pub fn begin_with(&mut self, card: &mut Card, dice: DiceSet, events: &mut Vec<GameEvent>) {
        card.age_annotations();
        events.push(GameEvent::CardRendered { cells: grid_view(card) });

        let (die0, die1) = dice.faces();
        debug!(die0, die1, "turn started");
        events.push(GameEvent::DiceShown { die0, die1 });

        self.turn = Some(Turn {
            dice,
            picks_left: self.rules.picks_per_turn,
            seconds_left: self.rules.seconds_per_turn,
        });
        events.push(GameEvent::TimerChanged { seconds_left: self.rules.seconds_per_turn });
    }

    /// Still inside the post-roll grace window?
    pub fn is_busy(&self) -> bool {
        match &self.turn {
            Some(t) => self.rules.seconds_per_turn.saturating_sub(t.seconds_left) < self.rules.busy_ticks,
            None => true,
        }
    }

    pub fn accepts_pick(&self) -> bool {
        match &self.turn {
            Some(t) => t.picks_left > 0 && !self.is_busy(),
            None => false,
        }
    }

    /// Evaluate a pick at `(row, col)`.
    /// Returns `None` (and changes nothing) when the pick is not allowed.
    pub fn pick(
        &mut self,
        card: &mut Card,
        row: usize,
        col: usize,
        events: &mut Vec<GameEvent>,
    ) -> Option<Outcome> {
        if !self.accepts_pick() {
            debug!(row, col, "pick ignored: turn not accepting picks");
            return None;
        }
        let turn = self.turn.as_mut()?;
        let cell = card.cell_mut(row, col)?;
        if !cell.annotation.is_pickable() {
            debug!(row, col, annotation = ?cell.annotation, "pick ignored: cell not empty");
            return None;
        }

        let value = cell.value;
        let outcome = matching::evaluate(cell, &mut turn.dice);
        turn.picks_left -= 1;
        debug!(row, col, value, ?outcome, picks_left = turn.picks_left, "pick evaluated");

        events.push(GameEvent::CellOutcome { row, col, outcome });
        Some(outcome)
    }

    /// One countdown unit. Returns true when a new turn was started.
    pub fn tick<R: Rng + ?Sized>(&mut self, card: &mut Card, rng: &mut R, events: &mut Vec<GameEvent>) -> bool {
        let turn = match self.turn.as_mut() {
            Some(t) => t,
            None => return false,
        };
        turn.seconds_left = turn.seconds_left.saturating_sub(1);
        trace!(seconds_left = turn.seconds_left, "tick");
        events.push(GameEvent::TimerChanged { seconds_left: turn.seconds_left });

        if turn.seconds_left == 0 {
            self.begin(card, rng, events);
            return true;
        }
        false
    }
}
