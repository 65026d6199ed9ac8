/// Turn clock abstraction.
///
/// The session never sleeps or schedules; it asks a `Clock` to start and
/// stop, and receives ticks tagged with the `Subscription` that produced
/// them. Every `start()` mints a new subscription and every `stop()` retires
/// the live one, so a tick that was issued before a pause cannot be mistaken
/// for a tick of the resumed run.

use std::time::{Duration, Instant};

/// Identity of one start..stop run of a clock.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Subscription(u64);

impl Subscription {
    pub fn id(self) -> u64 {
        self.0
    }
}

pub trait Clock {
    /// Begin ticking. Any previous subscription is invalidated.
    fn start(&mut self) -> Subscription;
    /// Stop ticking. Safe to call when already stopped.
    fn stop(&mut self);
}

/// Hands out monotonically increasing subscription ids.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionCounter {
    last: u64,
}

impl SubscriptionCounter {
    pub fn next(&mut self) -> Subscription {
        self.last += 1;
        Subscription(self.last)
    }
}

/// Wall-clock ticker polled from the frame loop.
pub struct IntervalClock {
    period: Duration,
    ids: SubscriptionCounter,
    live: Option<Subscription>,
    next_due: Instant,
}

impl IntervalClock {
    pub fn new(period: Duration) -> Self {
        IntervalClock {
            period,
            ids: SubscriptionCounter::default(),
            live: None,
            next_due: Instant::now(),
        }
    }

    /// Yield at most one tick if a period has elapsed.
    /// A clock that fell more than a period behind re-anchors on `now`
    /// instead of replaying the missed ticks.
    pub fn poll(&mut self, now: Instant) -> Option<Subscription> {
        let live = self.live?;
        if now < self.next_due {
            return None;
        }
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        Some(live)
    }
}

impl Clock for IntervalClock {
    fn start(&mut self) -> Subscription {
        let sub = self.ids.next();
        self.live = Some(sub);
        self.next_due = Instant::now() + self.period;
        sub
    }

    fn stop(&mut self) {
        self.live = None;
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopped_clock_never_ticks() {
        let mut clock = IntervalClock::new(Duration::from_millis(10));
        let later = Instant::now() + Duration::from_secs(5);
        assert_eq!(clock.poll(later), None);
    }

    #[test]
    fn ticks_after_period() {
        let mut clock = IntervalClock::new(Duration::from_millis(100));
        let sub = clock.start();
        let start = Instant::now();
        assert_eq!(clock.poll(start), None);
        assert_eq!(clock.poll(start + Duration::from_millis(150)), Some(sub));
    }

    #[test]
    fn lagging_clock_does_not_burst() {
        let mut clock = IntervalClock::new(Duration::from_millis(100));
        clock.start();
        let late = Instant::now() + Duration::from_secs(10);
        assert!(clock.poll(late).is_some());
        assert_eq!(clock.poll(late), None);
    }

    #[test]
    fn restart_mints_new_subscription() {
        let mut clock = IntervalClock::new(Duration::from_millis(100));
        let first = clock.start();
        clock.stop();
        let second = clock.start();
        assert_ne!(first, second);
        let later = Instant::now() + Duration::from_secs(1);
        assert_eq!(clock.poll(later), Some(second));
    }

    #[test]
    fn stop_is_idempotent() {
        let mut clock = IntervalClock::new(Duration::from_millis(100));
        clock.stop();
        clock.start();
        clock.stop();
        clock.stop();
        assert_eq!(clock.poll(Instant::now() + Duration::from_secs(1)), None);
    }
}
