use super::params::QueryPatch;

#[derive(Clone, Debug, PartialEq, Eq)]
struct Pending {
    key: String,
    value: Option<String>,
    deadline: u64,
}

/// Timer-gated write queue: at most one pending value per key, the latest
/// value wins and every new value pushes that key's deadline back.
///
/// Time is supplied by the caller in milliseconds so the queue can be driven
/// by the browser clock or by tests.
#[derive(Clone, Debug)]
pub struct DebounceQueue {
    quiet_ms: u64,
    pending: Vec<Pending>,
}

impl DebounceQueue {
    pub fn new(quiet_ms: u64) -> Self {
        Self {
            quiet_ms,
            pending: Vec::new(),
        }
    }

    pub fn quiet_ms(&self) -> u64 {
        self.quiet_ms
    }

    /// Returns the deadline at which `key` becomes due.
    pub fn schedule(&mut self, key: &str, value: Option<String>, now_ms: u64) -> u64 {
        let deadline = now_ms.saturating_add(self.quiet_ms);
        match self.pending.iter_mut().find(|pending| pending.key == key) {
            Some(pending) => {
                pending.value = value;
                pending.deadline = deadline;
            }
            None => self.pending.push(Pending {
                key: key.to_string(),
                value,
                deadline,
            }),
        }
        deadline
    }

    pub fn flush_due(&mut self, now_ms: u64) -> QueryPatch {
        let mut patch = QueryPatch::new();
        self.pending.retain(|pending| {
            if pending.deadline <= now_ms {
                patch.put(&pending.key, pending.value.clone());
                false
            } else {
                true
            }
        });
        patch
    }

    pub fn flush_all(&mut self) -> QueryPatch {
        let mut patch = QueryPatch::new();
        for pending in self.pending.drain(..) {
            patch.put(&pending.key, pending.value);
        }
        patch
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|pending| pending.deadline).min()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }
}
