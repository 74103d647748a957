//! Delayed respawn queue
//!
//! Replaces wall-clock timers: a captured firefly gets a due time, and the
//! engine drains due entries against its clock once per frame.

/// A firefly waiting to come back
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRespawn {
    /// Clock time (ms) at which the firefly may reappear
    pub due_ms: f64,
    /// Index into the session's firefly list
    pub index: usize,
    /// Session generation the capture happened in
    pub session: u32,
}

/// Respawns ordered by due time (ties keep scheduling order)
#[derive(Debug, Clone, Default)]
pub struct RespawnQueue {
    pending: Vec<PendingRespawn>,
}

impl RespawnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_ms: f64, index: usize, session: u32) {
        let entry = PendingRespawn {
            due_ms,
            index,
            session,
        };
        let pos = self
            .pending
            .iter()
            .position(|p| p.due_ms > due_ms)
            .unwrap_or(self.pending.len());
        self.pending.insert(pos, entry);
    }

    /// Remove and return every entry due at or before `now_ms`
    pub fn take_due(&mut self, now_ms: f64) -> Vec<PendingRespawn> {
        let split = self
            .pending
            .iter()
            .position(|p| p.due_ms > now_ms)
            .unwrap_or(self.pending.len());
        self.pending.drain(..split).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_due_early() {
        let mut queue = RespawnQueue::new();
        queue.schedule(500.0, 0, 1);
        assert!(queue.take_due(499.9).is_empty());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_due_entries_come_out_once() {
        let mut queue = RespawnQueue::new();
        queue.schedule(500.0, 3, 1);
        let due = queue.take_due(500.0);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].index, 3);
        assert!(queue.take_due(10_000.0).is_empty());
    }

    #[test]
    fn test_ordered_by_due_time() {
        let mut queue = RespawnQueue::new();
        queue.schedule(900.0, 1, 1);
        queue.schedule(300.0, 2, 1);
        queue.schedule(300.0, 4, 1);
        queue.schedule(600.0, 3, 1);

        let due: Vec<usize> = queue.take_due(650.0).iter().map(|p| p.index).collect();
        assert_eq!(due, vec![2, 4, 3]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.take_due(900.0)[0].index, 1);
    }
}
