//! Bounded, newest-first message log.

use super::record::MessageRecord;
use crate::base::neterror::NetError;
use std::collections::VecDeque;

/// Number of records kept per log.
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Which of the two session logs an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogKind {
    Sent,
    Received,
}

impl LogKind {
    pub fn label(self) -> &'static str {
        match self {
            LogKind::Sent => "sent",
            LogKind::Received => "received",
        }
    }
}

impl std::str::FromStr for LogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" | "s" => Ok(LogKind::Sent),
            "received" | "r" => Ok(LogKind::Received),
            other => Err(format!("unknown log '{other}', expected 'sent' or 'received'")),
        }
    }
}

/// Ordered message history, newest first.
///
/// Pushing beyond capacity silently drops the oldest records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLog {
    records: VecDeque<MessageRecord>,
    capacity: usize,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}

impl MessageLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Build a log from records already ordered newest first.
    ///
    /// Anything past `capacity` is discarded, which also trims logs written
    /// by clients with a larger cap.
    pub fn from_records(records: Vec<MessageRecord>, capacity: usize) -> Self {
        let mut records = VecDeque::from(records);
        records.truncate(capacity);
        Self { records, capacity }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Prepend a record, dropping the oldest ones on overflow.
    pub fn push(&mut self, record: MessageRecord) {
        self.records.push_front(record);
        self.records.truncate(self.capacity);
    }

    /// Record at `index` (0 is newest).
    pub fn get(&self, index: usize) -> Option<&MessageRecord> {
        self.records.get(index)
    }

    /// Remove exactly the record at `index`.
    pub fn remove(&mut self, index: usize) -> Result<MessageRecord, NetError> {
        self.records
            .remove(index)
            .ok_or(NetError::RecordNotFound { index })
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &MessageRecord> {
        self.records.iter()
    }

    /// The underlying records, newest first.
    pub fn records(&self) -> &VecDeque<MessageRecord> {
        &self.records
    }
}
