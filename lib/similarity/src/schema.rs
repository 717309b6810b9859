//! Distance term modes
//!
//! Each term of the frame distance carries a mode saying whether it counts,
//! and which direction of change it tolerates. On the wire a mode is the
//! short string used by the frame finder UI: `""`, `"+"`, `"-"`, `"="`, or
//! `"ignore"` / `null`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid distance mode '{0}': expected \"\", \"+\", \"-\", \"=\" or \"ignore\"")]
pub struct ModeParseError(pub String);

/// How one distance term is scored. `delta` is always `candidate − reference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TermMode {
    /// Term does not contribute.
    Ignore,
    /// Any change is scored by its square.
    #[default]
    Unsigned,
    /// Candidate must not be smaller (`delta ≥ 0`).
    NonNegative,
    /// Candidate must not be larger (`delta ≤ 0`).
    NonPositive,
    /// Candidate must differ (`delta ≠ 0`).
    MustDiffer,
}

impl TermMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermMode::Ignore => "ignore",
            TermMode::Unsigned => "",
            TermMode::NonNegative => "+",
            TermMode::NonPositive => "-",
            TermMode::MustDiffer => "=",
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, TermMode::Ignore)
    }

    /// `true` when `delta` breaks the direction this mode requires.
    /// A non-finite delta breaks every enabled mode.
    pub fn is_violated_by(&self, delta: f64) -> bool {
        if !delta.is_finite() {
            return self.is_enabled();
        }
        match self {
            TermMode::Ignore | TermMode::Unsigned => false,
            TermMode::NonNegative => delta < 0.0,
            TermMode::NonPositive => delta > 0.0,
            TermMode::MustDiffer => delta == 0.0,
        }
    }
}

impl FromStr for TermMode {
    type Err = ModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(TermMode::Unsigned),
            "+" => Ok(TermMode::NonNegative),
            "-" => Ok(TermMode::NonPositive),
            "=" => Ok(TermMode::MustDiffer),
            s if s.eq_ignore_ascii_case("ignore") => Ok(TermMode::Ignore),
            other => Err(ModeParseError(other.to_string())),
        }
    }
}

impl fmt::Display for TermMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TermMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TermMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(TermMode::Ignore),
            Some(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Modes of the four distance terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceModes {
    #[serde(default)]
    pub dsd: TermMode,
    #[serde(default)]
    pub drop: TermMode,
    #[serde(default)]
    pub ratio_dsd_drop: TermMode,
    #[serde(default = "ignored")]
    pub fork_rate: TermMode,
}

fn ignored() -> TermMode {
    TermMode::Ignore
}

impl Default for DistanceModes {
    /// The three saddle terms unsigned, fork rate ignored.
    fn default() -> Self {
        Self {
            dsd: TermMode::Unsigned,
            drop: TermMode::Unsigned,
            ratio_dsd_drop: TermMode::Unsigned,
            fork_rate: TermMode::Ignore,
        }
    }
}

impl DistanceModes {
    pub const fn new(dsd: TermMode, drop: TermMode, ratio_dsd_drop: TermMode, fork_rate: TermMode) -> Self {
        Self {
            dsd,
            drop,
            ratio_dsd_drop,
            fork_rate,
        }
    }

    /// Modes the frame finder ranks with: a candidate must not raise the
    /// saddle-to-bar drop.
    pub const fn catalog_default() -> Self {
        Self::new(
            TermMode::Unsigned,
            TermMode::NonPositive,
            TermMode::Unsigned,
            TermMode::Ignore,
        )
    }

    /// All four terms unsigned.
    pub const fn all_unsigned() -> Self {
        Self::new(
            TermMode::Unsigned,
            TermMode::Unsigned,
            TermMode::Unsigned,
            TermMode::Unsigned,
        )
    }

    #[must_use]
    pub fn with_dsd(mut self, mode: TermMode) -> Self {
        self.dsd = mode;
        self
    }

    #[must_use]
    pub fn with_drop(mut self, mode: TermMode) -> Self {
        self.drop = mode;
        self
    }

    #[must_use]
    pub fn with_ratio_dsd_drop(mut self, mode: TermMode) -> Self {
        self.ratio_dsd_drop = mode;
        self
    }

    #[must_use]
    pub fn with_fork_rate(mut self, mode: TermMode) -> Self {
        self.fork_rate = mode;
        self
    }
}
