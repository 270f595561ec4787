// SPDX-FileCopyrightText: 2021 Kent Gibson <warthog618@gmail.com>
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// The global identifier for a GPIO pin, as used by the kernel.
///
/// This is the number written to the sysfs `export` file, and is the base of
/// the owning chip plus the offset of the line on that chip.
pub type Id = u32;

/// The direction of a pin.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// The pin is an input.
    #[default]
    Input,

    /// The pin is an output.
    Output,
}

impl Direction {
    /// The value of the sysfs `direction` attribute.
    pub fn as_attr(&self) -> &'static str {
        match self {
            Direction::Input => "in",
            Direction::Output => "out",
        }
    }

    /// Parse the sysfs `direction` attribute.
    pub fn from_attr(s: &str) -> Option<Direction> {
        match s {
            "in" => Some(Direction::Input),
            "out" => Some(Direction::Output),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Input => "input",
            Direction::Output => "output",
        };
        write!(f, "{}", s)
    }
}

/// The physical level of a pin.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Level {
    /// The pin is low.
    #[default]
    Low,

    /// The pin is high.
    High,
}

impl Level {
    /// The level opposite the current level.
    pub fn not(&self) -> Level {
        match self {
            Level::High => Level::Low,
            Level::Low => Level::High,
        }
    }

    /// The value of the sysfs `value` attribute.
    pub fn as_attr(&self) -> &'static str {
        match self {
            Level::Low => "0",
            Level::High => "1",
        }
    }

    /// Parse the first byte of the sysfs `value` attribute.
    pub fn from_attr_byte(b: u8) -> Option<Level> {
        match b {
            b'0' => Some(Level::Low),
            b'1' => Some(Level::High),
            _ => None,
        }
    }

    /// The value written to the sysfs `direction` attribute to switch the pin
    /// to an output at this level.
    pub(crate) fn as_output_attr(&self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::High => "high",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Level::High => "high",
            Level::Low => "low",
        };
        write!(f, "{}", s)
    }
}

impl From<Level> for bool {
    fn from(l: Level) -> bool {
        match l {
            Level::Low => false,
            Level::High => true,
        }
    }
}
impl From<Level> for u8 {
    fn from(l: Level) -> u8 {
        match l {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}
impl From<bool> for Level {
    fn from(b: bool) -> Level {
        match b {
            false => Level::Low,
            true => Level::High,
        }
    }
}

/// The edges of an input pin that trigger an interrupt.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Edge {
    /// Interrupts are disabled.
    #[default]
    None,

    /// Interrupt on transitions from low to high.
    Rising,

    /// Interrupt on transitions from high to low.
    Falling,

    /// Interrupt on any transition.
    Both,
}

impl Edge {
    /// The value of the sysfs `edge` attribute.
    pub fn as_attr(&self) -> &'static str {
        match self {
            Edge::None => "none",
            Edge::Rising => "rising",
            Edge::Falling => "falling",
            Edge::Both => "both",
        }
    }

    /// Parse the sysfs `edge` attribute.
    pub fn from_attr(s: &str) -> Option<Edge> {
        match s {
            "none" => Some(Edge::None),
            "rising" => Some(Edge::Rising),
            "falling" => Some(Edge::Falling),
            "both" => Some(Edge::Both),
            _ => None,
        }
    }

    /// Returns true if the edge will trigger on a transition to the given level.
    pub fn triggers_on(&self, level: Level) -> bool {
        match self {
            Edge::None => false,
            Edge::Rising => level == Level::High,
            Edge::Falling => level == Level::Low,
            Edge::Both => true,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_attr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod direction {
        use super::*;

        #[test]
        fn default() {
            assert_eq!(Direction::default(), Direction::Input);
        }

        #[test]
        fn attr() {
            for d in [Direction::Input, Direction::Output] {
                assert_eq!(Direction::from_attr(d.as_attr()), Some(d));
            }
            assert_eq!(Direction::Input.as_attr(), "in");
            assert_eq!(Direction::Output.as_attr(), "out");
            assert_eq!(Direction::from_attr("sideways"), None);
            assert_eq!(Direction::from_attr("in\n"), None);
        }

        #[test]
        fn display() {
            assert_eq!(Direction::Input.to_string(), "input");
            assert_eq!(Direction::Output.to_string(), "output");
        }
    }

    mod level {
        use super::*;

        #[test]
        fn default() {
            assert_eq!(Level::default(), Level::Low);
        }

        #[test]
        fn not() {
            assert_eq!(Level::High.not(), Level::Low);
            assert_eq!(Level::Low.not(), Level::High);
        }

        #[test]
        fn attr() {
            assert_eq!(Level::Low.as_attr(), "0");
            assert_eq!(Level::High.as_attr(), "1");
            assert_eq!(Level::from_attr_byte(b'0'), Some(Level::Low));
            assert_eq!(Level::from_attr_byte(b'1'), Some(Level::High));
            assert_eq!(Level::from_attr_byte(b'2'), None);
            assert_eq!(Level::from_attr_byte(b'\n'), None);
            assert_eq!(Level::Low.as_output_attr(), "low");
            assert_eq!(Level::High.as_output_attr(), "high");
        }

        #[test]
        fn from_bool() {
            assert_eq!(Level::from(true), Level::High);
            assert_eq!(Level::from(false), Level::Low);
        }

        #[test]
        fn into_bool() {
            let b: bool = Level::High.into();
            assert!(b);
            let b: bool = Level::Low.into();
            assert!(!b);
        }

        #[test]
        fn into_u8() {
            let v: u8 = Level::High.into();
            assert_eq!(v, 1);
            let v: u8 = Level::Low.into();
            assert_eq!(v, 0);
        }
    }

    mod edge {
        use super::*;

        #[test]
        fn default() {
            assert_eq!(Edge::default(), Edge::None);
        }

        #[test]
        fn attr() {
            for e in [Edge::None, Edge::Rising, Edge::Falling, Edge::Both] {
                assert_eq!(Edge::from_attr(e.as_attr()), Some(e));
                assert_eq!(e.to_string(), e.as_attr());
            }
            assert_eq!(Edge::from_attr("Rising"), None);
            assert_eq!(Edge::from_attr(""), None);
        }

        #[test]
        fn triggers_on() {
            assert!(!Edge::None.triggers_on(Level::High));
            assert!(!Edge::None.triggers_on(Level::Low));
            assert!(Edge::Rising.triggers_on(Level::High));
            assert!(!Edge::Rising.triggers_on(Level::Low));
            assert!(!Edge::Falling.triggers_on(Level::High));
            assert!(Edge::Falling.triggers_on(Level::Low));
            assert!(Edge::Both.triggers_on(Level::High));
            assert!(Edge::Both.triggers_on(Level::Low));
        }
    }
}
