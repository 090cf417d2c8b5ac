//! Frame-driven delayed tasks
//!
//! A task is plain data scheduled to come due after a delay measured in
//! simulation time. The owner calls [`Scheduler::advance`] once per frame and
//! acts on whatever comes due; nothing ever blocks.

/// Handle for cancelling a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TaskId,
    due: f32,
    task: T,
}

/// Queue of tasks keyed by due time
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: f32,
    next_id: u64,
    /// Sorted by due time, then by scheduling order
    entries: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: 0.0,
            next_id: 1,
            entries: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scheduler clock (sum of all advanced time)
    pub fn now(&self) -> f32 {
        self.now
    }

    /// Run `task` once `delay` more time has passed
    pub fn schedule(&mut self, delay: f32, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay.max(0.0);

        // Insert after every entry due at or before this one (stable order)
        let index = self.entries.partition_point(|e| e.due <= due);
        self.entries.insert(index, Entry { id, due, task });
        id
    }

    /// Remove a pending task; returns it if it had not fired yet
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index).task)
    }

    /// Advance the clock and drain every task now due, earliest first
    pub fn advance(&mut self, dt: f32) -> Vec<T> {
        self.now += dt.max(0.0);
        let due_count = self.entries.partition_point(|e| e.due <= self.now);
        self.entries.drain(..due_count).map(|e| e.task).collect()
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
