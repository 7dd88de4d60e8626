use rps_common::{Scheduler, TaskId};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

/// Real-time scheduler: each task is a sleeping tokio task that sends its id
/// back on a channel the game loop selects on.
pub struct TokioScheduler {
    next_id: u64,
    sender: UnboundedSender<TaskId>,
    handles: HashMap<TaskId, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, UnboundedReceiver<TaskId>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            next_id: 0,
            sender,
            handles: HashMap::new(),
        };
        (scheduler, receiver)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration) -> TaskId {
        self.handles.retain(|_, handle| !handle.is_finished());

        let id = TaskId::new(self.next_id);
        self.next_id += 1;

        let sender = self.sender.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = sender.send(id);
        });
        self.handles.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TaskId) {
        if let Some(handle) = self.handles.remove(&id) {
            handle.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tasks_arrive_in_deadline_order() {
        let (mut scheduler, mut fired) = TokioScheduler::new();
        let slow = scheduler.schedule(Duration::from_millis(60));
        let fast = scheduler.schedule(Duration::from_millis(10));

        assert_eq!(fired.recv().await, Some(fast));
        assert_eq!(fired.recv().await, Some(slow));
    }

    #[tokio::test]
    async fn test_cancelled_task_never_fires() {
        let (mut scheduler, mut fired) = TokioScheduler::new();
        let cancelled = scheduler.schedule(Duration::from_millis(10));
        let kept = scheduler.schedule(Duration::from_millis(40));
        scheduler.cancel(cancelled);
        scheduler.cancel(cancelled);

        assert_eq!(fired.recv().await, Some(kept));
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(fired.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_drop_aborts_pending_tasks() {
        let (mut scheduler, mut fired) = TokioScheduler::new();
        scheduler.schedule(Duration::from_millis(10));
        drop(scheduler);

        // All senders are gone once the aborted task is dropped
        let received = tokio::time::timeout(Duration::from_millis(200), fired.recv()).await;
        assert_eq!(received.ok().flatten(), None);
    }
}
