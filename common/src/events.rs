use std::cell::RefCell;
use std::rc::Rc;

use crate::games::matches::MatchOutcome;
use crate::games::rock_paper_scissors::{Player, RoundRecord};

/// Notifications emitted by the round engine after it changes state
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A slot was filled. `auto` is set for timeout picks and computer moves.
    /// The move itself stays hidden until the round resolves.
    MoveSubmitted { player: Player, auto: bool },
    ThinkingStarted,
    RoundResolved(RoundRecord),
    RoundStarted { round: u32 },
    Tick { remaining: u32 },
    TimedOut,
    MatchFinished {
        outcome: MatchOutcome,
        player1_score: u32,
        player2_score: u32,
    },
    PauseChanged(bool),
    Undone { round: u32 },
    Reset,
}

/// Observer of engine events (presentation, audio cues, logging)
pub trait EventSink {
    fn notify(&mut self, event: &EngineEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&EngineEvent),
{
    fn notify(&mut self, event: &EngineEvent) {
        self(event)
    }
}

/// Shared recording sink. Clones see the same buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<EngineEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<EngineEvent> {
        self.events.borrow_mut().drain(..).collect()
    }

    pub fn snapshot(&self) -> Vec<EngineEvent> {
        self.events.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for EventLog {
    fn notify(&mut self, event: &EngineEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_buffer() {
        let log = EventLog::new();
        let mut sink = log.clone();

        sink.notify(&EngineEvent::Reset);
        sink.notify(&EngineEvent::Tick { remaining: 3 });

        assert_eq!(log.len(), 2);
        assert_eq!(log.drain(), vec![EngineEvent::Reset, EngineEvent::Tick { remaining: 3 }]);
        assert!(log.is_empty());
    }

    #[test]
    fn test_closures_are_sinks() {
        let mut count = 0;
        {
            let mut sink = |_: &EngineEvent| count += 1;
            sink.notify(&EngineEvent::TimedOut);
            sink.notify(&EngineEvent::ThinkingStarted);
        }
        assert_eq!(count, 2);
    }
}
