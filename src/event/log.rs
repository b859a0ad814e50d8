use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

/// One logged user action
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: u64,
    pub timestamp: u64,
    pub text: String,
}

/// Ring buffer of recent actions shown in the status footer
pub struct EventLog {
    entries: VecDeque<Entry>,
    next_id: u64,
    max_entries: usize,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 1,
            max_entries: 200,
        }
    }

    pub fn log(&mut self, text: String) {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        self.entries.push_back(Entry {
            id: self.next_id,
            timestamp,
            text,
        });
        self.next_id += 1;

        // Trim old entries
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn latest(&self) -> Option<&Entry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
