/// GameSession: the top-level state machine.
///
/// ```text
///   FINISHED --toggle--> RUNNING   new card, new turn, clock started
///   RUNNING  --toggle--> PAUSED    clock stopped, everything frozen
///   PAUSED   --toggle--> RUNNING   clock restarted, countdown resumes
///   RUNNING  --bingo---> FINISHED  clock stopped
/// ```
///
/// All three inbound calls run to completion and return the notifications
/// they produced, in order. Calls outside their valid window are silent
/// no-ops: no state change, no events.
///
/// Ticks are tagged with the clock subscription that produced them; only
/// the live subscription is honoured, so nothing issued before a pause or
/// a finish can leak into the next run.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::TurnConfig;
use crate::domain::card::Card;
use crate::domain::matching::Outcome;
use crate::domain::win;
use super::clock::{Clock, Subscription};
use super::event::{grid_view, ButtonLabel, GameEvent};
use super::turn::TurnController;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    Running,
    Paused,
    Finished,
}

pub struct GameSession<C: Clock> {
    state: SessionState,
    card: Option<Card>,
    turns: TurnController,
    has_bingo: bool,
    clock: C,
    subscription: Option<Subscription>,
    rng: StdRng,
}

impl<C: Clock> GameSession<C> {
    pub fn new(rules: TurnConfig, clock: C, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        GameSession {
            state: SessionState::Finished,
            card: None,
            turns: TurnController::new(rules),
            has_bingo: false,
            clock,
            subscription: None,
            rng,
        }
    }

    // ── Queries ──

    pub fn has_bingo(&self) -> bool {
        self.has_bingo
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    // ── Inbound ──

    /// The single Start / Pause / Resume control.
    pub fn toggle(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        match self.state {
            SessionState::Finished => self.start_new_game(&mut events),
            SessionState::Running => {
                self.stop_clock();
                self.state = SessionState::Paused;
                info!("session paused");
                events.push(GameEvent::ButtonLabelChanged { label: ButtonLabel::Resume });
            }
            SessionState::Paused => {
                self.start_clock();
                self.state = SessionState::Running;
                info!("session resumed");
                events.push(GameEvent::ButtonLabelChanged { label: ButtonLabel::Pause });
            }
        }
        events
    }

    /// Pick the cell at `(row, col)`.
    pub fn pick(&mut self, row: usize, col: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state != SessionState::Running {
            debug!(row, col, state = ?self.state, "pick ignored: session not running");
            return events;
        }
        let card = match self.card.as_mut() {
            Some(c) => c,
            None => return events,
        };

        let outcome = self.turns.pick(card, row, col, &mut events);
        if outcome == Some(Outcome::Correct) && win::has_bingo(card) {
            self.finish(&mut events);
        }
        events
    }

    /// One countdown unit from the clock run identified by `from`.
    pub fn tick(&mut self, from: Subscription) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.state != SessionState::Running || self.subscription != Some(from) {
            debug!(tick = from.id(), "stale tick dropped");
            return events;
        }
        if let Some(card) = self.card.as_mut() {
            self.turns.tick(card, &mut self.rng, &mut events);
        }
        events
    }

    // ── Transitions ──

    fn start_new_game(&mut self, events: &mut Vec<GameEvent>) {
        self.stop_clock();
        self.has_bingo = false;

        let mut card = Card::generate(&mut self.rng);
        events.push(GameEvent::CardRendered { cells: grid_view(&card) });
        self.turns.begin(&mut card, &mut self.rng, events);
        self.card = Some(card);

        self.start_clock();
        self.state = SessionState::Running;
        info!(seconds_per_turn = self.turns.rules().seconds_per_turn, "session started");
        events.push(GameEvent::ButtonLabelChanged { label: ButtonLabel::Pause });
    }

    fn finish(&mut self, events: &mut Vec<GameEvent>) {
        self.stop_clock();
        self.has_bingo = true;
        self.state = SessionState::Finished;
        info!("bingo");
        events.push(GameEvent::Bingo);
        events.push(GameEvent::ButtonLabelChanged { label: ButtonLabel::Start });
    }

    fn start_clock(&mut self) {
        self.subscription = Some(self.clock.start());
    }

    fn stop_clock(&mut self) {
        self.clock.stop();
        self.subscription = None;
    }
}

#[cfg(test)]
impl<C: Clock> GameSession<C> {
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn card(&self) -> Option<&Card> {
        self.card.as_ref()
    }

    pub fn turn(&self) -> Option<&super::turn::Turn> {
        self.turns.turn()
    }

    pub fn card_mut(&mut self) -> Option<&mut Card> {
        self.card.as_mut()
    }

    /// Swap in fixed dice for the current turn.
    pub fn set_dice(&mut self, a: u32, b: u32) {
        if let Some(turn) = self.turns.turn_mut() {
            turn.dice = crate::domain::dice::DiceSet::from_values(a, b);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::card::{Annotation, GRID_DIM};
    use crate::sim::clock::testing::ManualClock;

    fn session() -> GameSession<ManualClock> {
        GameSession::new(TurnConfig::default(), ManualClock::default(), Some(2024))
    }

    fn tick_n(s: &mut GameSession<ManualClock>, n: u32) -> Vec<GameEvent> {
        let mut out = vec![];
        for _ in 0..n {
            if let Some(sub) = s.clock_mut().fire() {
                out.extend(s.tick(sub));
            }
        }
        out
    }

    /// Running session with fixed dice, past the busy window.
    fn running_with_dice(a: u32, b: u32) -> GameSession<ManualClock> {
        let mut s = session();
        s.toggle();
        tick_n(&mut s, 2);
        s.set_dice(a, b);
        s
    }

    fn set_value(s: &mut GameSession<ManualClock>, row: usize, col: usize, value: u32) {
        s.card_mut().unwrap().cell_mut(row, col).unwrap().value = value;
    }

    #[test]
    fn starts_finished_and_ignores_input() {
        let mut s = session();
        assert_eq!(s.state(), SessionState::Finished);
        assert!(s.pick(0, 0).is_empty());
        assert!(s.card().is_none());
        assert!(s.turn().is_none());
    }

    #[test]
    fn toggle_from_finished_starts_game() {
        let mut s = session();
        let events = s.toggle();

        assert_eq!(s.state(), SessionState::Running);
        assert!(!s.has_bingo());
        assert_eq!(s.clock_mut().starts, 1);
        assert!(matches!(events[0], GameEvent::CardRendered { .. }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::DiceShown { .. })));
        assert!(events.contains(&GameEvent::TimerChanged { seconds_left: 30 }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::ButtonLabelChanged { label: ButtonLabel::Pause })
        );

        let card = s.card().unwrap();
        assert!(card.rows().iter().flatten().all(|c| !c.marked && c.annotation == Annotation::Empty));
        let turn = s.turn().unwrap();
        assert_eq!((turn.picks_left, turn.seconds_left), (3, 30));
    }

    #[test]
    fn pick_in_busy_window_is_ignored() {
        let mut s = session();
        s.toggle();
        assert!(s.pick(0, 0).is_empty());
        tick_n(&mut s, 1);
        assert!(s.pick(0, 0).is_empty());
        assert_eq!(s.turn().unwrap().picks_left, 3);
        assert_eq!(s.card().unwrap().cell(0, 0).unwrap().annotation, Annotation::Empty);
    }

    #[test]
    fn pick_emits_outcome_and_uses_a_pick() {
        let mut s = running_with_dice(2, 3);
        set_value(&mut s, 0, 0, 6);
        set_value(&mut s, 0, 1, 7);

        assert_eq!(
            s.pick(0, 0),
            vec![GameEvent::CellOutcome { row: 0, col: 0, outcome: Outcome::Correct }]
        );
        assert!(s.turn().unwrap().dice.link_between(0, 1));
        assert_eq!(
            s.pick(0, 1),
            vec![GameEvent::CellOutcome { row: 0, col: 1, outcome: Outcome::Incorrect }]
        );
        assert_eq!(s.turn().unwrap().picks_left, 1);
        assert!(s.card().unwrap().is_marked(0, 0));
        assert!(!s.card().unwrap().is_marked(0, 1));
    }

    #[test]
    fn out_of_range_pick_is_ignored() {
        let mut s = running_with_dice(2, 3);
        assert!(s.pick(GRID_DIM, 0).is_empty());
        assert!(s.pick(0, 99).is_empty());
        assert_eq!(s.turn().unwrap().picks_left, 3);
    }

    #[test]
    fn completing_a_row_ends_the_session() {
        let mut s = running_with_dice(2, 3);
        {
            let card = s.card_mut().unwrap();
            for col in 0..GRID_DIM - 1 {
                card.cell_mut(0, col).unwrap().mark();
                card.cell_mut(0, col).unwrap().annotation = Annotation::Correct;
            }
        }
        set_value(&mut s, 0, GRID_DIM - 1, 5);

        let events = s.pick(0, GRID_DIM - 1);
        assert_eq!(
            events,
            vec![
                GameEvent::CellOutcome { row: 0, col: GRID_DIM - 1, outcome: Outcome::Correct },
                GameEvent::Bingo,
                GameEvent::ButtonLabelChanged { label: ButtonLabel::Start },
            ]
        );
        assert_eq!(s.state(), SessionState::Finished);
        assert!(s.has_bingo());
        assert_eq!(s.clock_mut().live, None);

        assert!(s.pick(1, 0).is_empty());
    }

    #[test]
    fn tick_from_before_finish_is_dropped() {
        let mut s = running_with_dice(2, 3);
        let stale = s.clock_mut().fire().unwrap();
        {
            let card = s.card_mut().unwrap();
            for col in 0..GRID_DIM - 1 {
                card.cell_mut(3, col).unwrap().mark();
            }
        }
        set_value(&mut s, 3, GRID_DIM - 1, 5);
        s.pick(3, GRID_DIM - 1);
        assert!(s.has_bingo());

        assert!(s.tick(stale).is_empty());
    }

    #[test]
    fn pause_freezes_turn_and_resume_continues() {
        let mut s = running_with_dice(2, 3);
        set_value(&mut s, 1, 1, 6);
        s.pick(1, 1);
        tick_n(&mut s, 5);
        let before = s.turn().unwrap().clone();
        let stale = s.clock_mut().fire().unwrap();

        let events = s.toggle();
        assert_eq!(s.state(), SessionState::Paused);
        assert_eq!(s.clock_mut().stops, 2);
        assert_eq!(s.clock_mut().live, None);
        assert_eq!(events, vec![GameEvent::ButtonLabelChanged { label: ButtonLabel::Resume }]);
        assert!(s.tick(stale).is_empty());
        assert!(s.pick(2, 2).is_empty());

        let events = s.toggle();
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(events, vec![GameEvent::ButtonLabelChanged { label: ButtonLabel::Pause }]);

        let after = s.turn().unwrap();
        assert_eq!(after.seconds_left, before.seconds_left);
        assert_eq!(after.picks_left, before.picks_left);
        assert_eq!(after.dice.slots(), before.dice.slots());

        // The pre-pause subscription stays dead after resume.
        assert!(s.tick(stale).is_empty());
        let events = tick_n(&mut s, 1);
        assert_eq!(events, vec![GameEvent::TimerChanged { seconds_left: before.seconds_left - 1 }]);
    }

    #[test]
    fn thirty_ticks_roll_a_new_turn() {
        let mut s = session();
        s.toggle();
        tick_n(&mut s, 29);
        assert_eq!(s.turn().unwrap().seconds_left, 1);

        let events = tick_n(&mut s, 1);
        assert_eq!(events[0], GameEvent::TimerChanged { seconds_left: 0 });
        assert!(events.iter().any(|e| matches!(e, GameEvent::DiceShown { .. })));
        let turn = s.turn().unwrap();
        assert_eq!((turn.picks_left, turn.seconds_left), (3, 30));
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn restart_after_bingo_gives_fresh_card() {
        let mut s = running_with_dice(2, 3);
        {
            let card = s.card_mut().unwrap();
            for k in 0..GRID_DIM - 1 {
                card.cell_mut(k, k).unwrap().mark();
            }
        }
        set_value(&mut s, GRID_DIM - 1, GRID_DIM - 1, 10);
        s.pick(GRID_DIM - 1, GRID_DIM - 1);
        assert!(s.has_bingo());

        s.toggle();
        assert_eq!(s.state(), SessionState::Running);
        assert!(!s.has_bingo());
        assert!(s.card().unwrap().rows().iter().flatten().all(|c| !c.marked));
        assert_eq!(s.clock_mut().starts, 2);
    }

    #[test]
    fn seeded_sessions_deal_the_same_card() {
        let mut a = session();
        let mut b = session();
        a.toggle();
        b.toggle();
        let va: Vec<u32> = a.card().unwrap().rows().iter().flatten().map(|c| c.value).collect();
        let vb: Vec<u32> = b.card().unwrap().rows().iter().flatten().map(|c| c.value).collect();
        assert_eq!(va, vb);
    }
}
