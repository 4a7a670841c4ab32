use std::time::Duration;

/// Handle for cancelling a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<E> {
    id: TimerId,
    due: Duration,
    every: Option<Duration>,
    event: E,
}

/// Single-threaded timer list. Time is whatever monotonic offset the caller
/// passes in; due events come back in deadline order, ties in the order
/// they were scheduled.
#[derive(Debug)]
pub struct Timeline<E> {
    pending: Vec<Pending<E>>,
    next_id: u64,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E: Clone> Timeline<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(&mut self, now: Duration, delay: Duration, event: E) -> TimerId {
        self.insert(now + delay, None, event)
    }

    /// A zero period is bumped to one millisecond so `poll` always terminates.
    pub fn every(&mut self, now: Duration, period: Duration, event: E) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        self.insert(now + period, Some(period), event)
    }

    fn insert(&mut self, due: Duration, every: Option<Duration>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending { id, due, every, event });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    #[cfg(test)]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Removes and returns the earliest event due at or before `now`.
    /// A periodic event fires once per call however many periods were
    /// missed, then re-arms one period after `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<E> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| (p.due, p.id.0))
            .map(|(i, _)| i)?;

        match self.pending[idx].every {
            Some(period) => {
                let slot = &mut self.pending[idx];
                let next = slot.due + period;
                slot.due = if next <= now { now + period } else { next };
                Some(slot.event.clone())
            }
            None => Some(self.pending.remove(idx).event),
        }
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.due).min()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
