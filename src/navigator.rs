//! Cursor over the mailbox's message identifiers
//!
//! Identifiers are kept oldest first. Browsing starts at the newest
//! message and the direction names follow the reading order of a
//! newest-first list: **`next` walks towards OLDER messages (index - 1)
//! and `previous` towards NEWER ones (index + 1)**. Movement stops at
//! both ends instead of wrapping.

use crate::error::{Error, Result};
use crate::message::MessageId;

#[derive(Debug, Clone)]
pub struct Navigator {
    ids: Vec<MessageId>,
    cursor: usize,
}

impl Navigator {
    /// Build a navigator positioned on the newest message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyMailbox`] when `ids` is empty.
    pub fn new(ids: Vec<MessageId>) -> Result<Self> {
        if ids.is_empty() {
            return Err(Error::EmptyMailbox);
        }
        let mut navigator = Self { ids, cursor: 0 };
        navigator.cursor = navigator.initial();
        Ok(navigator)
    }

    /// Index of the newest message.
    #[must_use]
    pub const fn initial(&self) -> usize {
        self.ids.len() - 1
    }

    /// Index one step older than `index`, or `None` at the oldest.
    #[must_use]
    pub const fn next_index(&self, index: usize) -> Option<usize> {
        index.checked_sub(1)
    }

    /// Index one step newer than `index`, or `None` at the newest.
    #[must_use]
    pub const fn previous_index(&self, index: usize) -> Option<usize> {
        if index + 1 < self.ids.len() {
            Some(index + 1)
        } else {
            None
        }
    }

    /// Step to the next (older) message. Returns `false` at the oldest.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        self.move_to(self.next_index(self.cursor))
    }

    /// Step to the previous (newer) message. Returns `false` at the newest.
    pub fn previous(&mut self) -> bool {
        self.move_to(self.previous_index(self.cursor))
    }

    const fn move_to(&mut self, index: Option<usize>) -> bool {
        let Some(index) = index else {
            return false;
        };
        self.cursor = index;
        true
    }

    #[must_use]
    pub fn current(&self) -> MessageId {
        self.ids[self.cursor]
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always `false`: an empty mailbox cannot be navigated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
