//! Control signals returned by enter/leave callbacks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SignalError;

/// A control value returned by an enter or leave callback.
///
/// Callbacks that have nothing to say return [`Signal::Continue`], which is
/// also the [`Default`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Signal {
    /// Keep walking normally.
    #[default]
    Continue,

    /// Terminate the whole traversal immediately.
    Abort,

    /// Do not descend into this node's children; go straight to its leave.
    ///
    /// Only meaningful from an enter callback. Returned from leave it acts
    /// like [`Signal::Continue`].
    #[serde(alias = "SKIPCHILDREN")]
    SkipChildren,

    /// Once this node (subtree and leave included) is done, visit no more of
    /// its siblings.
    ///
    /// When returned from enter, the skip is latched: the leave callback cannot
    /// cancel it, only override it with [`Signal::Abort`].
    #[serde(alias = "SKIPSIBLINGS")]
    SkipSiblings,
}

impl Signal {
    /// All signals, in code order.
    pub const ALL: [Signal; 4] = [
        Signal::Continue,
        Signal::Abort,
        Signal::SkipChildren,
        Signal::SkipSiblings,
    ];

    /// Returns the legacy numeric code of this signal.
    ///
    /// `Continue` is `0`; the others are negative.
    #[inline]
    pub const fn code(self) -> i32 {
        match self {
            Signal::Continue => 0,
            Signal::Abort => -1,
            Signal::SkipChildren => -2,
            Signal::SkipSiblings => -3,
        }
    }

    /// Returns the canonical upper-case name of this signal.
    pub const fn as_str(self) -> &'static str {
        match self {
            Signal::Continue => "CONTINUE",
            Signal::Abort => "ABORT",
            Signal::SkipChildren => "SKIP_CHILDREN",
            Signal::SkipSiblings => "SKIP_SIBLINGS",
        }
    }

    /// Returns true for [`Signal::Abort`].
    #[inline]
    pub const fn is_abort(self) -> bool {
        matches!(self, Signal::Abort)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for Signal {
    type Error = SignalError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Signal::ALL
            .into_iter()
            .find(|signal| signal.code() == code)
            .ok_or(SignalError::UnknownCode(code))
    }
}

impl From<Signal> for i32 {
    fn from(signal: Signal) -> Self {
        signal.code()
    }
}

impl FromStr for Signal {
    type Err = SignalError;

    /// Parses a signal name, case-insensitively.
    ///
    /// Both `SKIP_CHILDREN` and the unseparated `SKIPCHILDREN` spelling are
    /// accepted (likewise for siblings).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match normalized.as_str() {
            "CONTINUE" => Ok(Signal::Continue),
            "ABORT" => Ok(Signal::Abort),
            "SKIPCHILDREN" => Ok(Signal::SkipChildren),
            "SKIPSIBLINGS" => Ok(Signal::SkipSiblings),
            _ => Err(SignalError::unknown_name(s)),
        }
    }
}

/// The result of a traversal that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalkOutcome {
    /// Every reachable node was processed (or skipped on request).
    Completed,
    /// A callback signaled [`Signal::Abort`].
    Aborted,
}

impl WalkOutcome {
    /// Returns true if a callback aborted the traversal.
    #[inline]
    pub const fn is_aborted(self) -> bool {
        matches!(self, WalkOutcome::Aborted)
    }

    /// Returns the signal carried by this outcome.
    ///
    /// An aborted walk carries [`Signal::Abort`]; a completed walk carries none.
    #[inline]
    pub const fn signal(self) -> Option<Signal> {
        match self {
            WalkOutcome::Completed => None,
            WalkOutcome::Aborted => Some(Signal::Abort),
        }
    }
}

impl From<WalkOutcome> for Option<Signal> {
    fn from(outcome: WalkOutcome) -> Self {
        outcome.signal()
    }
}
