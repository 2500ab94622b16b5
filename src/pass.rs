//! Multi-pass compilation state machine.
//!
//! The usage registry is only complete once the whole first-party graph has
//! been parsed, which the host can only tell us by finishing a pass. So the
//! first pass scans and throws its output away, and the second pass rewrites
//! and emits.
//!
//! ```text
//! Init --begin_pass--> ScanningUsage --query (run again)--> Rewriting --query (stop)--> Done
//! ```

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum PassState {
    Init = 0,
    ScanningUsage = 1,
    Rewriting = 2,
    Done = 3,
}

impl PassState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => PassState::Init,
            1 => PassState::ScanningUsage,
            2 => PassState::Rewriting,
            _ => PassState::Done,
        }
    }

    /// A pass has started producing modules.
    pub fn on_begin_pass(self) -> PassState {
        match self {
            PassState::Init => PassState::ScanningUsage,
            other => other,
        }
    }

    /// Answers the host's "does this compilation need another pass" query.
    /// Returns the next state and whether to run again.
    pub fn on_need_additional_pass(self) -> (PassState, bool) {
        match self {
            PassState::Init | PassState::ScanningUsage => (PassState::Rewriting, true),
            PassState::Rewriting | PassState::Done => (PassState::Done, false),
        }
    }

    /// Output produced before the registry is complete must never be emitted.
    pub fn emits_allowed(self) -> bool {
        self >= PassState::Rewriting
    }

    pub fn rewrites_allowed(self) -> bool {
        self == PassState::Rewriting
    }

    pub fn scanning_allowed(self) -> bool {
        self != PassState::Done
    }
}

/// Shared holder for the current [`PassState`].
///
/// Every transition is a single atomic step, so scans running on other
/// threads never race the pass query.
#[derive(Debug)]
pub struct PassController {
    state: AtomicU8,
}

impl Default for PassController {
    fn default() -> Self {
        Self::new()
    }
}

impl PassController {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(PassState::Init as u8),
        }
    }

    pub fn state(&self) -> PassState {
        PassState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Only ever moves `Init` forward, so a scan racing the pass query can
    /// not undo its transition.
    pub fn begin_pass(&self) -> PassState {
        let next = PassState::Init.on_begin_pass();
        match self.state.compare_exchange(
            PassState::Init as u8,
            next as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        ) {
            Ok(_) => next,
            Err(current) => PassState::from_u8(current),
        }
    }

    pub fn need_additional_pass(&self) -> bool {
        let previous = self
            .state
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |value| {
                Some(PassState::from_u8(value).on_need_additional_pass().0 as u8)
            })
            .unwrap_or_else(|value| value);
        PassState::from_u8(previous).on_need_additional_pass().1
    }

    /// Starts over for a new build (e.g. a watch-mode rebuild).
    pub fn reset(&self) {
        self.state.store(PassState::Init as u8, Ordering::SeqCst);
    }
}
