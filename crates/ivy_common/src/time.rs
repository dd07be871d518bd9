//! Run-time values with unit parsing and display.
//!
//! [`RunTime`] is the user-facing pair of a positive integer and a
//! [`TimeUnit`]. Its [`SimulatedDuration`] is held exactly in femtoseconds so
//! that the generated settings file never suffers from floating point drift.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;
/// Femtoseconds per millisecond.
pub const FS_PER_MS: u64 = 1_000_000_000_000;
/// Femtoseconds per second.
pub const FS_PER_S: u64 = 1_000_000_000_000_000;

/// A metric time unit accepted for the simulation run time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    /// Femtoseconds.
    Fs,
    /// Picoseconds.
    Ps,
    /// Nanoseconds.
    Ns,
    /// Microseconds (the default unit).
    #[default]
    Us,
    /// Milliseconds.
    Ms,
    /// Seconds.
    S,
}

impl TimeUnit {
    /// All units, smallest first.
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::Fs,
        TimeUnit::Ps,
        TimeUnit::Ns,
        TimeUnit::Us,
        TimeUnit::Ms,
        TimeUnit::S,
    ];

    /// Returns the number of femtoseconds in one unit.
    pub fn femtoseconds(self) -> u64 {
        match self {
            TimeUnit::Fs => 1,
            TimeUnit::Ps => FS_PER_PS,
            TimeUnit::Ns => FS_PER_NS,
            TimeUnit::Us => FS_PER_US,
            TimeUnit::Ms => FS_PER_MS,
            TimeUnit::S => FS_PER_S,
        }
    }

    /// Returns the length of one unit in seconds.
    pub fn scale(self) -> f64 {
        match self {
            TimeUnit::Fs => 1e-15,
            TimeUnit::Ps => 1e-12,
            TimeUnit::Ns => 1e-9,
            TimeUnit::Us => 1e-6,
            TimeUnit::Ms => 1e-3,
            TimeUnit::S => 1.0,
        }
    }

    /// Returns the unit suffix as written in run-time strings.
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Fs => "fs",
            TimeUnit::Ps => "ps",
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }

    /// Returns the next larger unit, wrapping from seconds back to femtoseconds.
    pub fn next(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Returns the next smaller unit, wrapping from femtoseconds up to seconds.
    pub fn prev(self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|u| *u == self).unwrap_or(0)
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for TimeUnit {
    type Err = ParseRunTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        TimeUnit::ALL
            .into_iter()
            .find(|u| u.suffix() == s)
            .ok_or_else(|| ParseRunTimeError::UnknownUnit(s.to_string()))
    }
}

/// Errors produced when building or parsing a [`RunTime`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseRunTimeError {
    /// The input string was empty.
    #[error("empty run time")]
    Empty,
    /// No leading integer was found.
    #[error("invalid run time: no numeric value in '{0}'")]
    MissingValue(String),
    /// The unit suffix was absent.
    #[error("missing unit in run time '{0}' (use fs, ps, ns, us, ms, or s)")]
    MissingUnit(String),
    /// The unit suffix is not one of the supported units.
    #[error("unknown time unit '{0}' (use fs, ps, ns, us, ms, or s)")]
    UnknownUnit(String),
    /// The run time value was zero.
    #[error("run time must be a positive integer")]
    Zero,
    /// The run time does not fit in the femtosecond range.
    #[error("run time {0} is too large")]
    TooLarge(String),
}

/// The length of a simulation, stored in femtoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimulatedDuration(u64);

impl SimulatedDuration {
    /// Creates a duration from a femtosecond count.
    pub fn from_fs(fs: u64) -> Self {
        Self(fs)
    }

    /// Returns the duration in femtoseconds.
    pub fn as_fs(&self) -> u64 {
        self.0
    }

    /// Returns the duration in seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / FS_PER_S as f64
    }

    /// Formats the duration as an exact decimal number of picoseconds.
    ///
    /// `10 ns` becomes `"10000"` and `5 fs` becomes `"0.005"`.
    pub fn picosecond_literal(&self) -> String {
        let whole = self.0 / FS_PER_PS;
        let frac = self.0 % FS_PER_PS;
        if frac == 0 {
            return whole.to_string();
        }
        let digits = format!("{frac:03}");
        format!("{whole}.{}", digits.trim_end_matches('0'))
    }
}

impl fmt::Display for SimulatedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fs = self.0;
        if fs == 0 {
            return write!(f, "0 fs");
        }
        let unit = TimeUnit::ALL
            .into_iter()
            .rev()
            .find(|u| fs >= u.femtoseconds() && fs.is_multiple_of(u.femtoseconds()))
            .unwrap_or(TimeUnit::Fs);
        write!(f, "{} {}", fs / unit.femtoseconds(), unit)
    }
}

/// A configured simulation run time: a positive integer count of a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RunTime {
    value: u32,
    unit: TimeUnit,
}

impl RunTime {
    /// Smallest value offered by the front-ends.
    pub const MIN_VALUE: u32 = 1;
    /// Largest value offered by the front-ends.
    pub const MAX_VALUE: u32 = 999;

    /// Creates a run time, rejecting zero and values that overflow the
    /// femtosecond range.
    pub fn new(value: u32, unit: TimeUnit) -> Result<Self, ParseRunTimeError> {
        if value == 0 {
            return Err(ParseRunTimeError::Zero);
        }
        if u64::from(value).checked_mul(unit.femtoseconds()).is_none() {
            return Err(ParseRunTimeError::TooLarge(format!("{value}{unit}")));
        }
        Ok(Self { value, unit })
    }

    /// Returns the integer count.
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Returns the unit.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Returns the derived simulated duration (`value × scale(unit)`).
    pub fn duration(&self) -> SimulatedDuration {
        SimulatedDuration(u64::from(self.value) * self.unit.femtoseconds())
    }
}

impl Default for RunTime {
    fn default() -> Self {
        Self {
            value: 1,
            unit: TimeUnit::Us,
        }
    }
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

impl FromStr for RunTime {
    type Err = ParseRunTimeError;

    /// Parses strings like `"100ns"`, `"1 us"` or `"10ms"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseRunTimeError::Empty);
        }

        let digit_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        if digit_end == 0 {
            return Err(ParseRunTimeError::MissingValue(s.to_string()));
        }

        let value: u32 = s[..digit_end]
            .parse()
            .map_err(|_| ParseRunTimeError::TooLarge(s.to_string()))?;

        let unit = s[digit_end..].trim();
        if unit.is_empty() {
            return Err(ParseRunTimeError::MissingUnit(s.to_string()));
        }

        RunTime::new(value, unit.parse()?)
    }
}
