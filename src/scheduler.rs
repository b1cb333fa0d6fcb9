use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Delayed tasks driven by the UI loop. Nothing runs on its own: the loop
/// calls `take_due` with the current time and executes what comes back.
#[derive(Debug)]
pub struct Scheduler<T> {
    next_id: u64,
    pending: Vec<(TaskHandle, Instant, T)>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn schedule_after(&mut self, now: Instant, delay: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.pending.push((handle, now + delay, task));
        handle
    }

    /// Returns the task if it had not fired yet.
    pub fn cancel(&mut self, handle: TaskHandle) -> Option<T> {
        let pos = self.pending.iter().position(|(h, _, _)| *h == handle)?;
        Some(self.pending.remove(pos).2)
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.pending.iter().any(|(h, _, _)| *h == handle)
    }

    /// Removes and returns every task whose deadline has passed, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<T> {
        let mut due = Vec::new();
        let mut idx = 0;
        while idx < self.pending.len() {
            if self.pending[idx].1 <= now {
                due.push(self.pending.remove(idx));
            } else {
                idx += 1;
            }
        }
        due.sort_by_key(|(handle, at, _)| (*at, handle.0));
        due.into_iter().map(|(_, _, task)| task).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|(_, at, _)| *at).min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Keeps at most one pending value; each call replaces it and restarts the
/// quiet period.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    scheduler: Scheduler<T>,
    handle: Option<TaskHandle>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            scheduler: Scheduler::new(),
            handle: None,
        }
    }

    pub fn call(&mut self, now: Instant, value: T) {
        self.cancel();
        self.handle = Some(self.scheduler.schedule_after(now, self.delay, value));
    }

    pub fn cancel(&mut self) -> Option<T> {
        let handle = self.handle.take()?;
        self.scheduler.cancel(handle)
    }

    /// Takes the pending value without waiting for its deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.cancel()
    }

    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let value = self.scheduler.take_due(now).pop()?;
        self.handle = None;
        Some(value)
    }

    pub fn is_pending(&self) -> bool {
        self.handle
            .is_some_and(|handle| self.scheduler.is_pending(handle))
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_task_never_fires() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule_after(start, Duration::from_millis(10), "a");
        scheduler.schedule_after(start, Duration::from_millis(5), "b");
        assert_eq!(scheduler.cancel(a), Some("a"));
        assert_eq!(scheduler.take_due(start + Duration::from_millis(20)), vec!["b"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn due_tasks_come_back_in_deadline_order() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(start, Duration::from_millis(30), 3);
        scheduler.schedule_after(start, Duration::from_millis(10), 1);
        scheduler.schedule_after(start, Duration::from_millis(20), 2);
        assert_eq!(scheduler.take_due(start + Duration::from_millis(25)), vec![1, 2]);
        assert_eq!(scheduler.len(), 1);
    }
}
