/// Dice set: the three live match values of a turn.
///
/// Slots:
///   0: die A   (1..=DIE_MAX)
///   1: die B   (1..=DIE_MAX)
///   2: A + B
///
/// Each slot is consumed at most once per turn. When a cell could be
/// satisfied by exactly two slots, the decision is deferred by linking
/// the pair; links are always symmetric.

use rand::Rng;

pub const DIE_MAX: u32 = 10;
pub const SLOT_COUNT: usize = 3;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DieSlot {
    pub value: u32,
    pub available: bool,
    pub link: Option<usize>,
}

impl DieSlot {
    fn fresh(value: u32) -> Self {
        DieSlot { value, available: true, link: None }
    }
}

#[derive(Clone, Debug)]
pub struct DiceSet {
    slots: [DieSlot; SLOT_COUNT],
}

impl DiceSet {
    /// Roll both dice; every slot starts available and unlinked.
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let a = rng.random_range(1..=DIE_MAX);
        let b = rng.random_range(1..=DIE_MAX);
        Self::from_values(a, b)
    }

    /// Fixed dice, for replays and tests.
    pub fn from_values(a: u32, b: u32) -> Self {
        DiceSet {
            slots: [DieSlot::fresh(a), DieSlot::fresh(b), DieSlot::fresh(a + b)],
        }
    }

    /// The two visible dice (the sum slot is never shown).
    pub fn faces(&self) -> (u32, u32) {
        (self.slots[0].value, self.slots[1].value)
    }

    pub fn slots(&self) -> &[DieSlot; SLOT_COUNT] {
        &self.slots
    }

    pub fn slot(&self, k: usize) -> Option<&DieSlot> {
        self.slots.get(k)
    }

    #[cfg(test)]
    pub fn is_available(&self, k: usize) -> bool {
        self.slot(k).map_or(false, |s| s.available)
    }

    pub fn link_of(&self, k: usize) -> Option<usize> {
        self.slot(k).and_then(|s| s.link)
    }

    /// Are `k` and `m` linked to each other?
    pub fn link_between(&self, k: usize, m: usize) -> bool {
        self.link_of(k) == Some(m) && self.link_of(m) == Some(k)
    }

    pub fn consume(&mut self, k: usize) {
        if let Some(slot) = self.slots.get_mut(k) {
            slot.available = false;
        }
    }

    /// Record a deferred decision between two distinct slots.
    pub fn link(&mut self, k: usize, m: usize) {
        if k == m || k >= SLOT_COUNT || m >= SLOT_COUNT { return; }
        self.slots[k].link = Some(m);
        self.slots[m].link = Some(k);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn roll_stays_in_range_and_sums() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let dice = DiceSet::roll(&mut rng);
            let s = dice.slots();
            assert!((1..=DIE_MAX).contains(&s[0].value));
            assert!((1..=DIE_MAX).contains(&s[1].value));
            assert_eq!(s[2].value, s[0].value + s[1].value);
            assert!(s.iter().all(|slot| slot.available && slot.link.is_none()));
        }
    }

    #[test]
    fn link_is_symmetric() {
        let mut dice = DiceSet::from_values(2, 3);
        dice.link(0, 2);
        assert_eq!(dice.link_of(0), Some(2));
        assert_eq!(dice.link_of(2), Some(0));
        assert_eq!(dice.link_of(1), None);
        assert!(dice.link_between(2, 0));
        assert!(!dice.link_between(0, 1));
    }

    #[test]
    fn self_link_ignored() {
        let mut dice = DiceSet::from_values(4, 4);
        dice.link(1, 1);
        assert_eq!(dice.link_of(1), None);
    }

    #[test]
    fn consume_marks_unavailable() {
        let mut dice = DiceSet::from_values(2, 3);
        dice.consume(1);
        assert!(dice.is_available(0));
        assert!(!dice.is_available(1));
        assert!(!dice.is_available(7));
    }

    #[test]
    fn faces_hide_sum() {
        assert_eq!(DiceSet::from_values(6, 9).faces(), (6, 9));
    }
}
