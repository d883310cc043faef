//! Host-clocked repeating task
//!
//! Driven by timestamps the host passes in, so it never outlives its owner:
//! once cancelled (or dropped) it simply stops reporting due runs.

/// Upper bound on runs reported by a single poll after a long stall
const MAX_CATCH_UP: u32 = 4;

#[derive(Debug, Clone)]
pub struct RepeatingTask {
    interval_ms: f64,
    next_due_ms: Option<f64>,
}

impl RepeatingTask {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(1.0),
            next_due_ms: None,
        }
    }

    /// (Re)arm the task; first run is one interval after `now_ms`
    pub fn start(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.interval_ms);
    }

    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Number of runs due at `now_ms`, advancing the schedule past them
    pub fn poll(&mut self, now_ms: f64) -> u32 {
        let Some(mut due) = self.next_due_ms else {
            return 0;
        };

        let mut runs = 0;
        while due <= now_ms {
            runs += 1;
            due += self.interval_ms;
        }
        if runs > MAX_CATCH_UP {
            // Drop the backlog
            runs = MAX_CATCH_UP;
            due = now_ms + self.interval_ms;
        }
        self.next_due_ms = Some(due);
        runs
    }
}
