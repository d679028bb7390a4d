//! Per-user memory state.

use std::collections::VecDeque;

use time::OffsetDateTime;

use crate::index::VectorIndex;
use crate::long_term::LongTermMemory;
use crate::short_term::ShortTermMemory;
use crate::types::{Exchange, MemorySnapshot};

/// Everything the engine remembers about one user.
///
/// Guarded as a single unit: short-term entries, long-term chunks and the index over them are
/// only ever read or written together under the user's lock.
#[derive(Debug)]
pub struct UserMemoryState<I> {
    /// Recent topic summaries.
    pub short_term: ShortTermMemory,
    /// Indexed semantic chunks.
    pub long_term: LongTermMemory<I>,
    exchanges: VecDeque<Exchange>,
    history: usize,
}

impl<I: VectorIndex> UserMemoryState<I> {
    /// Creates empty state sized by `history` short-term entries and vectors of `dimension`.
    #[must_use]
    pub fn new(history: usize, dimension: usize) -> Self {
        Self {
            short_term: ShortTermMemory::new(history),
            long_term: LongTermMemory::new(dimension),
            exchanges: VecDeque::with_capacity(history),
            history,
        }
    }

    /// Appends a raw exchange to the log, dropping the oldest past capacity.
    pub fn record_exchange(&mut self, query: &str, response: &str) {
        self.exchanges.push_back(Exchange {
            query: query.to_owned(),
            response: response.to_owned(),
            at: OffsetDateTime::now_utc(),
        });
        while self.exchanges.len() > self.history {
            self.exchanges.pop_front();
        }
    }

    /// Raw exchange log, oldest first.
    pub fn exchanges(&self) -> impl Iterator<Item = &Exchange> {
        self.exchanges.iter()
    }

    /// Copies the state out for inspection.
    #[must_use]
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            short_term: self.short_term.iter().cloned().collect(),
            long_term: self.long_term.iter().cloned().collect(),
            exchanges: self.exchanges.iter().cloned().collect(),
        }
    }
}
