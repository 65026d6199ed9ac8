/// Match engine: decides whether a picked cell is satisfied by the dice.
///
/// A cell matches slot `k` when slot `k` is still available and divides the
/// cell value. With `possible` = the set of matching slots:
///
///   0 slots  → Incorrect. Nothing changes except the annotation.
///   1 slot   → Correct. Consume it, and its link partner if it has one.
///   2 slots  → Correct. Both unlinked: link them (decide later).
///              Already linked to each other: consume both.
///              Anything else: accept without touching the dice.
///   3 slots  → Correct, dice untouched.
///
/// The last two rows are deliberately permissive: a pair overlapping some
/// other link is credited but left unresolved.

use super::card::{Annotation, Cell};
use super::dice::DiceSet;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Slots able to satisfy `value`, in slot order.
pub fn possible_slots(value: u32, dice: &DiceSet) -> Vec<usize> {
    dice.slots()
        .iter()
        .enumerate()
        .filter(|(_, s)| s.available && s.value != 0 && value % s.value == 0)
        .map(|(k, _)| k)
        .collect()
}

/// Evaluate a pick on `cell`, updating the cell and the dice in place.
pub fn evaluate(cell: &mut Cell, dice: &mut DiceSet) -> Outcome {
    let possible = possible_slots(cell.value, dice);

    match possible.as_slice() {
        [] => {
            cell.annotation = Annotation::Incorrect;
            return Outcome::Incorrect;
        }
        &[k] => {
            let partner = dice.link_of(k);
            dice.consume(k);
            if let Some(m) = partner {
                dice.consume(m);
            }
        }
        &[k, m] => {
            if dice.link_of(k).is_none() && dice.link_of(m).is_none() {
                dice.link(k, m);
            } else if dice.link_between(k, m) {
                dice.consume(k);
                dice.consume(m);
            }
        }
        _ => {}
    }

    cell.annotation = Annotation::Correct;
    cell.mark();
    Outcome::Correct
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(value: u32, dice: &mut DiceSet) -> (Outcome, Cell) {
        let mut cell = Cell::new(value);
        let outcome = evaluate(&mut cell, dice);
        (outcome, cell)
    }

    #[test]
    fn no_divisor_is_incorrect() {
        let mut dice = DiceSet::from_values(2, 3);
        let before = dice.slots().clone();
        let (outcome, cell) = pick(7, &mut dice);
        assert_eq!(outcome, Outcome::Incorrect);
        assert_eq!(cell.annotation, Annotation::Incorrect);
        assert!(!cell.marked);
        assert_eq!(dice.slots(), &before);
    }

    #[test]
    fn single_divisor_consumes_slot() {
        let mut dice = DiceSet::from_values(2, 3);
        let (outcome, cell) = pick(25, &mut dice);
        assert_eq!(outcome, Outcome::Correct);
        assert!(cell.marked);
        assert_eq!(cell.annotation, Annotation::Correct);
        assert!(dice.is_available(0));
        assert!(dice.is_available(1));
        assert!(!dice.is_available(2));
    }

    #[test]
    fn two_divisors_defer_then_single_resolves() {
        let mut dice = DiceSet::from_values(2, 3);

        let (outcome, _) = pick(6, &mut dice);
        assert_eq!(outcome, Outcome::Correct);
        assert!(dice.link_between(0, 1));
        assert!(dice.is_available(0));
        assert!(dice.is_available(1));

        let (outcome, _) = pick(9, &mut dice);
        assert_eq!(outcome, Outcome::Correct);
        assert!(!dice.is_available(1));
        assert!(!dice.is_available(0));
        assert!(dice.is_available(2));
    }

    #[test]
    fn same_pair_twice_consumes_both() {
        let mut dice = DiceSet::from_values(2, 3);
        pick(6, &mut dice);
        let (outcome, _) = pick(12, &mut dice);
        assert_eq!(outcome, Outcome::Correct);
        assert!(!dice.is_available(0));
        assert!(!dice.is_available(1));
        assert!(dice.is_available(2));

        let (outcome, _) = pick(6, &mut dice);
        assert_eq!(outcome, Outcome::Incorrect);
    }

    #[test]
    fn overlapping_pair_is_credited_without_change() {
        // 2, 5 → sum 7. 10 links {0,1}; 14 offers {0,2} while 0 is linked to 1.
        let mut dice = DiceSet::from_values(2, 5);
        pick(10, &mut dice);
        assert!(dice.link_between(0, 1));
        let before = dice.slots().clone();

        let (outcome, cell) = pick(14, &mut dice);
        assert_eq!(outcome, Outcome::Correct);
        assert!(cell.marked);
        assert_eq!(dice.slots(), &before);
    }

    #[test]
    fn all_three_slots_credited_without_change() {
        let mut dice = DiceSet::from_values(2, 2);
        let (outcome, cell) = pick(4, &mut dice);
        assert_eq!(outcome, Outcome::Correct);
        assert!(cell.marked);
        assert!(dice.slots().iter().all(|s| s.available && s.link.is_none()));
    }

    #[test]
    fn consumed_slot_no_longer_matches() {
        let mut dice = DiceSet::from_values(7, 9);
        pick(14, &mut dice);
        assert!(!dice.is_available(0));
        assert_eq!(possible_slots(21, &dice), Vec::<usize>::new());
        assert_eq!(possible_slots(32, &dice), vec![2]);
    }
}
