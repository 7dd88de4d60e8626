use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Handle to a deferred callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(raw: u64) -> Self {
        TaskId(raw)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Deferred delivery of task ids back to the engine.
///
/// The host hands each due id to `RoundEngine::fire`. Cancelling an id that
/// already fired, was already cancelled or never existed does nothing.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TaskId;
    fn cancel(&mut self, id: TaskId);
}

/// Scheduler on a virtual clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    queue: BTreeSet<(Duration, TaskId)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.queue.iter().any(|(_, queued)| *queued == id)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.iter().next().map(|(deadline, _)| *deadline)
    }

    /// Remove the earliest task due at or before `until`, moving the clock to its deadline
    pub fn pop_due(&mut self, until: Duration) -> Option<TaskId> {
        let first = *self.queue.iter().next()?;
        if first.0 > until {
            return None;
        }
        self.queue.remove(&first);
        self.now = self.now.max(first.0);
        Some(first.1)
    }

    pub fn advance_to(&mut self, t: Duration) {
        self.now = self.now.max(t);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.queue.insert((self.now + delay, id));
        id
    }

    fn cancel(&mut self, id: TaskId) {
        self.queue.retain(|(_, queued)| *queued != id);
    }
}
