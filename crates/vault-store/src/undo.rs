//! Single-slot pending undo state
//!
//! Holds at most one deleted row. A second delete overwrites the first, which
//! then can never be undone.

use std::time::Duration;
use vault_domain::EvidenceVersion;

/// A deleted row staged for a possible undo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    /// The row exactly as it was before deletion
    pub evidence: EvidenceVersion,

    /// Its tag names at deletion time
    pub tags: Vec<String>,

    /// Its insertion sequence, so a restored row keeps its listing position
    pub seq: i64,

    /// When the delete committed (unix millis)
    pub deleted_at: u64,

    /// Highest version left in the group right after the delete
    pub group_max_after_delete: Option<u32>,
}

impl PendingDelete {
    /// Milliseconds since the delete
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.deleted_at)
    }

    /// Whether the undo window has closed
    ///
    /// Only an age past the window is expired; exactly the window still
    /// counts as inside it.
    pub fn is_expired(&self, now: u64, window: Duration) -> bool {
        u128::from(self.age(now)) > window.as_millis()
    }
}

/// The process-wide undo slot owned by a store
#[derive(Debug, Default)]
pub struct UndoSlot {
    pending: Option<PendingDelete>,
}

impl UndoSlot {
    /// Stage a delete, returning whatever it displaced
    pub fn stage(&mut self, pending: PendingDelete) -> Option<PendingDelete> {
        self.pending.replace(pending)
    }

    /// Take the pending delete if it is still inside `window`
    ///
    /// The slot is empty afterwards whether or not anything was returned.
    pub fn take_fresh(&mut self, now: u64, window: Duration) -> Option<PendingDelete> {
        self.pending
            .take()
            .filter(|pending| !pending.is_expired(now, window))
    }

    /// Look at the pending delete without consuming it
    pub fn peek(&self) -> Option<&PendingDelete> {
        self.pending.as_ref()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}
