/// Delayed work the session can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Speak the target of the given round
    AnnounceTarget { round: u32 },
    ClearEncouragement,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    due_ms: u64,
    generation: u64,
    task: Task,
}

/// Cancellable timers on the session's own clock.
///
/// Every task is stamped with the generation current when it was scheduled.
/// `cancel_all` bumps the generation, so anything scheduled before it can
/// never fire, even if it is still queued.
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    generation: u64,
    pending: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay_ms: u32, task: Task) {
        self.pending.push(Scheduled {
            due_ms: self.now_ms + delay_ms as u64,
            generation: self.generation,
            task,
        });
    }

    /// Drop pending tasks matching `pred`, leaving the others alone
    pub fn cancel_where<F: Fn(&Task) -> bool>(&mut self, pred: F) {
        self.pending.retain(|s| !pred(&s.task));
    }

    pub fn cancel_all(&mut self) {
        self.generation += 1;
        self.pending.clear();
    }

    /// Advance the clock and return due tasks in the order they fell due
    pub fn advance(&mut self, delta_ms: u32) -> Vec<Task> {
        self.now_ms += delta_ms as u64;
        let now = self.now_ms;
        let generation = self.generation;

        let mut due: Vec<Scheduled> = Vec::new();
        self.pending.retain(|s| {
            if s.due_ms <= now {
                due.push(*s);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|s| s.due_ms);
        due.into_iter()
            .filter(|s| s.generation == generation)
            .map(|s| s.task)
            .collect()
    }

    pub fn is_pending(&self, task: Task) -> bool {
        self.pending
            .iter()
            .any(|s| s.task == task && s.generation == self.generation)
    }
}
