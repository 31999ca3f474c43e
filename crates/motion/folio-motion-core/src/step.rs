//! Animation steps and their placement on a timeline.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use folio_api_core::{StyleMap, TargetPath};

use crate::ease::Ease;
use crate::error::MotionError;

/// Where a step starts, relative to what is already scheduled.
///
/// String form follows the familiar timeline notation:
/// - `">"` or empty: after the current end ([`Position::Sequential`])
/// - `"-=0.6"` / `"+=0.2"`: offset from the current end
/// - `"<"`: together with the previous step
/// - `"1.5"` (or a bare number in JSON): absolute time
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum Position {
    #[default]
    Sequential,
    Absolute(f32),
    Relative(f32),
    WithPrevious,
}

impl Position {
    pub fn parse(s: &str) -> Result<Self, MotionError> {
        let s = s.trim();
        let invalid = || MotionError::InvalidPosition(s.to_string());
        match s {
            "" | ">" => return Ok(Position::Sequential),
            "<" => return Ok(Position::WithPrevious),
            _ => {}
        }
        let finite = |v: f32| if v.is_finite() { Ok(v) } else { Err(invalid()) };
        if let Some(rest) = s.strip_prefix("-=") {
            let d: f32 = rest.trim().parse().map_err(|_| invalid())?;
            return Ok(Position::Relative(-finite(d)?));
        }
        if let Some(rest) = s.strip_prefix("+=") {
            let d: f32 = rest.trim().parse().map_err(|_| invalid())?;
            return Ok(Position::Relative(finite(d)?));
        }
        let t: f32 = s.parse().map_err(|_| invalid())?;
        if finite(t)? < 0.0 {
            return Err(invalid());
        }
        Ok(Position::Absolute(t))
    }

    /// Resolve to an absolute start time given the current timeline end and
    /// the previous step's start.
    pub fn resolve(&self, end: f32, prev_start: f32) -> f32 {
        let t = match *self {
            Position::Sequential => end,
            Position::Absolute(t) => t,
            Position::Relative(d) => end + d,
            Position::WithPrevious => prev_start,
        };
        t.max(0.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Sequential => f.write_str(">"),
            Position::Absolute(t) => write!(f, "{t}"),
            Position::Relative(d) if *d < 0.0 => write!(f, "-={}", -d),
            Position::Relative(d) => write!(f, "+={d}"),
            Position::WithPrevious => f.write_str("<"),
        }
    }
}

impl FromStr for Position {
    type Err = MotionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::parse(s)
    }
}

impl Serialize for Position {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Position::Absolute(t) => serializer.serialize_f32(*t),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f32),
            Str(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Num(t) if t.is_finite() && t >= 0.0 => Ok(Position::Absolute(t)),
            Raw::Num(t) => Err(de::Error::custom(format!("invalid position {t}"))),
            Raw::Str(s) => Position::parse(&s).map_err(de::Error::custom),
        }
    }
}

/// One property animation on one element.
///
/// `from == None` makes a `to` step: its start values are read from the
/// stage the first time the playhead reaches it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationStep {
    pub target: TargetPath,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<StyleMap>,
    pub to: StyleMap,
    pub duration: f32,
    #[serde(default)]
    pub ease: Ease,
    #[serde(default)]
    pub position: Position,
}

impl AnimationStep {
    pub fn from_to(target: TargetPath, from: StyleMap, to: StyleMap, duration: f32) -> Self {
        Self {
            target,
            from: Some(from),
            to,
            duration,
            ease: Ease::default(),
            position: Position::Sequential,
        }
    }

    pub fn to(target: TargetPath, to: StyleMap, duration: f32) -> Self {
        Self {
            target,
            from: None,
            to,
            duration,
            ease: Ease::default(),
            position: Position::Sequential,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn validate(&self) -> Result<(), MotionError> {
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(MotionError::InvalidDuration {
                target: self.target.to_string(),
                duration: self.duration,
            });
        }
        self.to.validate()?;
        if let Some(from) = &self.from {
            from.validate()?;
        }
        Ok(())
    }
}
