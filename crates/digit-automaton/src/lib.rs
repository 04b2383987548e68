//! A finite automaton recognizing strings of exactly twelve ASCII digits.
//!
//! The automaton has thirteen states. `S1` is the start state, `S2..=S12` count the digits
//! consumed so far and `S0` is a non-accepting sink. Acceptance is attached to a transition
//! rather than to a state: only the digit transition out of `S12` accepts, and it leads into
//! the sink. Any further character is therefore consumed by a non-accepting transition.
//!
//! ```
//! use mega_digit_automaton::matches;
//!
//! assert!(matches("123456789012"));
//! assert!(!matches("1234567890123"));
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use core::fmt;

/// A state of the automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum DigitState {
    S0 = 0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
    S9,
    S10,
    S11,
    S12,
}

impl DigitState {
    /// The state every run starts in.
    pub const START: Self = Self::S1;

    /// Whether the state is the sink no transition leaves.
    pub const fn is_sink(self) -> bool {
        matches!(self, Self::S0)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DigitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.index())
    }
}

/// The class of an input character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// An ASCII digit `0..=9`.
    Digit,
    /// Anything else.
    Other,
}

impl CharClass {
    /// Classifies `c`.
    pub const fn of(c: char) -> Self {
        if c.is_ascii_digit() {
            Self::Digit
        } else {
            Self::Other
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Digit => 0,
            Self::Other => 1,
        }
    }
}

/// Next state per `[state][class]`.
const TRANSITIONS: [[DigitState; 2]; 13] = {
    use DigitState::{S0, S1, S10, S11, S12, S2, S3, S4, S5, S6, S7, S8, S9};
    [
        [S0, S0],
        [S2, S0],
        [S3, S0],
        [S4, S0],
        [S5, S0],
        [S6, S0],
        [S7, S0],
        [S8, S0],
        [S9, S0],
        [S10, S0],
        [S11, S0],
        [S12, S0],
        [S0, S0],
    ]
};

/// Whether the transition taken from `state` on `class` accepts.
pub const fn accepts(state: DigitState, class: CharClass) -> bool {
    matches!((state, class), (DigitState::S12, CharClass::Digit))
}

/// The outcome of one transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The state the transition leads to.
    pub next: DigitState,
    /// Whether the transition accepts.
    pub accepts: bool,
}

/// Takes the transition from `state` on `c`.
pub const fn step(state: DigitState, c: char) -> Transition {
    let class = CharClass::of(c);
    Transition { next: TRANSITIONS[state.index()][class.index()], accepts: accepts(state, class) }
}

/// The result of running the automaton over an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trace {
    /// The state after the last character.
    pub state: DigitState,
    /// The acceptance flag of the last transition, `false` if no character was consumed.
    pub accepted: bool,
    /// Number of characters consumed.
    pub consumed: usize,
}

/// Runs the automaton over `input` from [`DigitState::START`].
pub fn run(input: &str) -> Trace {
    input.chars().fold(
        Trace { state: DigitState::START, accepted: false, consumed: 0 },
        |trace, c| {
            let transition = step(trace.state, c);
            Trace {
                state: transition.next,
                accepted: transition.accepts,
                consumed: trace.consumed + 1,
            }
        },
    )
}

/// Returns whether `input` consists of exactly twelve ASCII digits.
pub fn matches(input: &str) -> bool {
    run(input).accepted
}
