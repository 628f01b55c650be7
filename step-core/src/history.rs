//! Undo/redo history for twostep.
//!
//! This module provides a bounded log of past piece states with:
//! - A cursor marking the state currently shown
//! - Linear undo semantics (a push after undo drops the redo branch)
//! - A hard cap on length so memory stays bounded
//!
//! The buffer is used by step-client's controller. Every accepted mutation
//! is pushed, and undo/redo only move the cursor.

use std::collections::VecDeque;
use twostep_types::State;

/// Maximum number of states kept in the history.
pub const MAX_HISTORY: usize = 10;

/// Bounded history of states with an undo/redo cursor.
///
/// Entries are stored oldest first. The buffer is never empty: it is
/// constructed from a seed state and no operation removes the last entry.
///
/// States flow through the buffer like this:
/// 1. `push()` - drop anything after the cursor, append, move cursor to tail
/// 2. `undo()` / `redo()` - move the cursor one step, never past either end
/// 3. `replace()` - swap in a history loaded from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBuffer {
    /// Maximum number of entries.
    limit: usize,
    /// States in append order.
    entries: VecDeque<State>,
    /// Index of the current state in `entries`.
    cursor: usize,
}

impl HistoryBuffer {
    /// Create a buffer holding only `seed`, capped at [`MAX_HISTORY`].
    pub fn new(seed: State) -> Self {
        Self::with_limit(seed, MAX_HISTORY)
    }

    /// Create a buffer holding only `seed` with a custom cap.
    ///
    /// A limit of zero is treated as one.
    pub fn with_limit(seed: State, limit: usize) -> Self {
        let mut entries = VecDeque::with_capacity(limit.max(1));
        entries.push_back(seed);
        Self {
            limit: limit.max(1),
            entries,
            cursor: 0,
        }
    }

    /// Record a new state.
    ///
    /// Any entries after the cursor are discarded first, then the oldest
    /// entries are trimmed until the cap holds. The cursor ends at the tail.
    pub fn push(&mut self, state: State) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(state);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one state if possible and return the current state.
    pub fn undo(&mut self) -> State {
        if self.can_undo() {
            self.cursor -= 1;
        }
        self.current()
    }

    /// Step forward one state if possible and return the current state.
    pub fn redo(&mut self) -> State {
        if self.can_redo() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Replace the whole history with the last `keep_last` states of `all`.
    ///
    /// `keep_last` is further capped by the buffer limit. The cursor moves
    /// to the newest kept state. An empty `all` leaves the buffer untouched.
    pub fn replace<I>(&mut self, all: I, keep_last: usize)
    where
        I: IntoIterator<Item = State>,
    {
        let all: Vec<State> = all.into_iter().collect();
        if all.is_empty() {
            return;
        }
        let keep = keep_last.clamp(1, self.limit);
        let start = all.len().saturating_sub(keep);
        self.entries = all[start..].iter().copied().collect();
        self.cursor = self.entries.len() - 1;
    }

    /// Drop everything and start over from `seed`.
    pub fn reset(&mut self, seed: State) {
        self.entries.clear();
        self.entries.push_back(seed);
        self.cursor = 0;
    }

    /// The state at the cursor.
    pub fn current(&self) -> State {
        self.entries[self.cursor]
    }

    /// Whether `undo()` would move the cursor.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Whether `redo()` would move the cursor.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Index of the current state.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of stored states (always at least one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; the buffer holds at least its seed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured cap.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Stored states, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &State> + '_ {
        self.entries.iter()
    }
}
