//! Transient "just added" highlight.
//!
//! # Invariants
//! - At most one memo is highlighted at a time.
//! - Arming again supersedes the pending highlight; a superseded token can
//!   never clear the newer highlight (last writer wins).

use crate::model::memo::MemoId;

pub const DEFAULT_FLASH_DURATION_MS: i64 = 600;

/// Handle for one armed highlight, passed back when its timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashToken(u64);

#[derive(Debug, Clone)]
struct PendingFlash {
    memo_id: MemoId,
    token: FlashToken,
    deadline_ms: i64,
}

/// One-shot highlight with last-writer-wins timer semantics.
#[derive(Debug, Clone)]
pub struct FlashTracker {
    duration_ms: i64,
    next_token: u64,
    pending: Option<PendingFlash>,
}

impl Default for FlashTracker {
    fn default() -> Self {
        Self::with_duration_ms(DEFAULT_FLASH_DURATION_MS)
    }
}

impl FlashTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration_ms(duration_ms: i64) -> Self {
        Self {
            duration_ms: duration_ms.max(0),
            next_token: 0,
            pending: None,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    /// Highlights `memo_id`, cancelling any pending highlight.
    pub fn arm(&mut self, memo_id: impl Into<MemoId>, now_ms: i64) -> FlashToken {
        self.next_token += 1;
        let token = FlashToken(self.next_token);
        self.pending = Some(PendingFlash {
            memo_id: memo_id.into(),
            token,
            deadline_ms: now_ms.saturating_add(self.duration_ms),
        });
        token
    }

    /// Timer callback. Clears only when `token` is still the current one.
    pub fn fire(&mut self, token: FlashToken) -> bool {
        match &self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Highlighted memo id, if the highlight has not expired at `now_ms`.
    pub fn active(&self, now_ms: i64) -> Option<&str> {
        self.pending
            .as_ref()
            .filter(|pending| now_ms < pending.deadline_ms)
            .map(|pending| pending.memo_id.as_str())
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
