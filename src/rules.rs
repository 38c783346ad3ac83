use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rules of Conway's Game of Life.
pub const B3S23: RuleSet = match RuleSet::new(0b1000, 0b1100) {
    Some(set) => set,
    None => unreachable!(),
};

/// # Representation
/// Life rules are represented as
/// ```notrust
/// |------birth------|
/// 0000_0000_0000_0000_0000_0000_0000_0000
///                     |----survival-----|
/// ```
///
/// Bit `i` of either half set means `i` live neighbours trigger a birth (or a survival).
///
/// Birth on zero neighbours is never representable. The engine only evaluates cells that are
/// alive or touch a live cell, which is only sound if an isolated dead cell stays dead.
///
/// See: https://conwaylife.com/wiki/Rulestring
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct RuleSet {
    rule: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Rule \"{rule}\" is missing its '{part}' part")]
    MissingPart { rule: String, part: char },

    #[error("Expected a neighbour count between 0 and 8, found '{got}'")]
    InvalidCount { got: char },

    #[error("Unexpected '{got}' in rule")]
    UnexpectedChar { got: char },

    #[error("Birth on 0 neighbours is not supported")]
    BirthOnZero,
}

impl Default for RuleSet {
    fn default() -> Self {
        B3S23
    }
}

impl RuleSet {
    /// Create a new `RuleSet` for the given births and survivals. For both `b` and `s`, bit `i`
    /// on means `i` is included in the set. Any bit past the 8th is ignored.
    ///
    /// Returns `None` if `b` includes birth on 0 neighbours.
    pub const fn new(b: u16, s: u16) -> Option<Self> {
        let b = b & 0x1FF;
        let s = s & 0x1FF;

        if b & 1 != 0 {
            return None;
        }

        Some(Self {
            rule: (b as u32) << 16 | s as u32,
        })
    }

    pub const fn births(&self) -> u16 {
        ((self.rule & 0x1FF0000) >> 0x10) as u16
    }

    pub const fn survivals(&self) -> u16 {
        (self.rule & 0x1FF) as u16
    }

    /// State of a cell in the next generation, given its current state and how many of its 8
    /// neighbours are alive.
    #[inline]
    pub const fn next_state(&self, alive: bool, neighbours: u8) -> bool {
        debug_assert!(neighbours <= 8);

        let mask = if alive {
            self.survivals()
        } else {
            self.births()
        };

        mask & (1 << neighbours) != 0
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RuleSet({self})")
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = |mask: u16| {
            (0..=8u8)
                .filter(|&n| mask & (1 << n) != 0)
                .map(|n| char::from(b'0' + n))
                .collect::<String>()
        };

        write!(f, "B{}/S{}", digits(self.births()), digits(self.survivals()))
    }
}

/// Accepts `B3/S23`, `b3s23` and `B3S23`.
impl FromStr for RuleSet {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        #[derive(Clone, Copy)]
        enum State {
            Start,
            Birth,
            Survival,
        }

        let mut state = State::Start;
        let (mut b, mut s_mask) = (0u16, 0u16);
        let (mut seen_b, mut seen_s) = (false, false);

        for c in s.trim().chars() {
            match (c, state) {
                ('b' | 'B', State::Start) => {
                    state = State::Birth;
                    seen_b = true;
                }
                ('/', State::Birth) => {}
                ('s' | 'S', State::Birth) => {
                    state = State::Survival;
                    seen_s = true;
                }
                (c, State::Birth | State::Survival) => {
                    let n = c
                        .to_digit(10)
                        .filter(|&n| n <= 8)
                        .ok_or(RuleError::InvalidCount { got: c })?;

                    match state {
                        State::Birth => b |= 1 << n,
                        _ => s_mask |= 1 << n,
                    }
                }
                (c, State::Start) => return Err(RuleError::UnexpectedChar { got: c }),
            }
        }

        if !seen_b {
            return Err(RuleError::MissingPart {
                rule: s.to_string(),
                part: 'B',
            });
        }

        if !seen_s {
            return Err(RuleError::MissingPart {
                rule: s.to_string(),
                part: 'S',
            });
        }

        RuleSet::new(b, s_mask).ok_or(RuleError::BirthOnZero)
    }
}
