//! Named easing curves.
//!
//! Names use the tween-library notation the page was authored in:
//! `none`, `linear`, `power1..power4`, `quad|cubic|quart|quint`, `sine`,
//! `expo`, `back(overshoot)`, each with an optional `.in`, `.out` or
//! `.inOut` suffix (default `.out`).

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::MotionError;

const DEFAULT_OVERSHOOT: f32 = 1.70158;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EaseMode {
    In,
    Out,
    InOut,
}

impl EaseMode {
    fn as_str(self) -> &'static str {
        match self {
            EaseMode::In => "in",
            EaseMode::Out => "out",
            EaseMode::InOut => "inOut",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// `powerN`: polynomial of degree N + 1.
    Power { degree: u8, mode: EaseMode },
    Sine(EaseMode),
    Expo(EaseMode),
    Back { mode: EaseMode, overshoot: f32 },
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Power {
            degree: 1,
            mode: EaseMode::Out,
        }
    }
}

#[inline]
fn in_out(t: f32, f: impl Fn(f32) -> f32) -> f32 {
    if t < 0.5 {
        f(t * 2.0) / 2.0
    } else {
        1.0 - f((1.0 - t) * 2.0) / 2.0
    }
}

#[inline]
fn by_mode(mode: EaseMode, t: f32, ease_in: impl Fn(f32) -> f32) -> f32 {
    match mode {
        EaseMode::In => ease_in(t),
        EaseMode::Out => 1.0 - ease_in(1.0 - t),
        EaseMode::InOut => in_out(t, ease_in),
    }
}

impl Ease {
    /// Map linear progress `t` to eased progress. Inputs are clamped to
    /// [0, 1]; the endpoints map exactly to 0 and 1. Back curves overshoot
    /// in between.
    pub fn apply(&self, t: f32) -> f32 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Ease::Linear => t,
            Ease::Power { degree, mode } => {
                let exp = degree as i32 + 1;
                by_mode(mode, t, |x| x.powi(exp))
            }
            Ease::Sine(mode) => by_mode(mode, t, |x| 1.0 - (x * PI / 2.0).cos()),
            Ease::Expo(mode) => by_mode(mode, t, |x| {
                if x <= 0.0 {
                    0.0
                } else {
                    2f32.powf(10.0 * (x - 1.0))
                }
            }),
            Ease::Back { mode, overshoot } => {
                let s = if matches!(mode, EaseMode::InOut) {
                    overshoot * 1.525
                } else {
                    overshoot
                };
                by_mode(mode, t, |x| x * x * ((s + 1.0) * x - s))
            }
        }
    }

    /// Parse a named curve such as `power2.out` or `back.out(1.7)`.
    pub fn parse(name: &str) -> Result<Self, MotionError> {
        let unknown = || MotionError::UnknownEase(name.to_string());
        let name = name.trim();
        let (head, arg) = match name.find('(') {
            Some(open) => {
                let inner = name[open + 1..].strip_suffix(')').ok_or_else(unknown)?;
                let arg = inner.trim().parse::<f32>().map_err(|_| unknown())?;
                (&name[..open], Some(arg))
            }
            None => (name, None),
        };
        let (base, mode) = match head.split_once('.') {
            Some((base, m)) => {
                let mode = match m {
                    "in" => EaseMode::In,
                    "out" => EaseMode::Out,
                    "inOut" => EaseMode::InOut,
                    _ => return Err(unknown()),
                };
                (base, mode)
            }
            None => (head, EaseMode::Out),
        };
        let power = |degree: u8| Ease::Power { degree, mode };
        let ease = match base {
            "none" | "linear" | "power0" => Ease::Linear,
            "power1" | "quad" => power(1),
            "power2" | "cubic" => power(2),
            "power3" | "quart" => power(3),
            "power4" | "quint" | "strong" => power(4),
            "sine" => Ease::Sine(mode),
            "expo" => Ease::Expo(mode),
            "back" => Ease::Back {
                mode,
                overshoot: arg.unwrap_or(DEFAULT_OVERSHOOT),
            },
            _ => return Err(unknown()),
        };
        if arg.is_some() && !matches!(ease, Ease::Back { .. }) {
            return Err(unknown());
        }
        Ok(ease)
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::Linear => f.write_str("none"),
            Ease::Power { degree, mode } => write!(f, "power{degree}.{}", mode.as_str()),
            Ease::Sine(mode) => write!(f, "sine.{}", mode.as_str()),
            Ease::Expo(mode) => write!(f, "expo.{}", mode.as_str()),
            Ease::Back { mode, overshoot } => {
                write!(f, "back.{}({overshoot})", mode.as_str())
            }
        }
    }
}

impl FromStr for Ease {
    type Err = MotionError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ease::parse(s)
    }
}

impl Serialize for Ease {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ease {
    fn deserialize<D>(deserializer: D) -> Result<Ease, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ease::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-5, "left={a} right={b}");
    }

    #[test]
    fn endpoints_are_exact() {
        for name in [
            "none",
            "power1.inOut",
            "power2.out",
            "power4.in",
            "sine.inOut",
            "expo.out",
            "back.out(1.7)",
            "back.inOut",
        ] {
            let e = Ease::parse(name).unwrap();
            assert_eq!(e.apply(0.0), 0.0, "{name}");
            assert_eq!(e.apply(1.0), 1.0, "{name}");
            assert_eq!(e.apply(-0.5), 0.0, "{name}");
            assert_eq!(e.apply(1.5), 1.0, "{name}");
        }
    }

    #[test]
    fn power_curves() {
        let p2_out = Ease::parse("power2.out").unwrap();
        approx(p2_out.apply(0.5), 1.0 - 0.5f32.powi(3));
        let p1_in = Ease::parse("power1.in").unwrap();
        approx(p1_in.apply(0.5), 0.25);
        let p1_in_out = Ease::parse("power1.inOut").unwrap();
        approx(p1_in_out.apply(0.5), 0.5);
        approx(p1_in_out.apply(0.25), 0.125);
    }

    #[test]
    fn back_out_overshoots() {
        let back = Ease::parse("back.out(1.7)").unwrap();
        let peak = (1..100)
            .map(|i| back.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn default_suffix_is_out() {
        assert_eq!(
            Ease::parse("power3").unwrap(),
            Ease::Power {
                degree: 3,
                mode: EaseMode::Out
            }
        );
        assert_eq!(Ease::default().to_string(), "power1.out");
    }

    #[test]
    fn display_roundtrips_through_parse() {
        let e = Ease::parse("back.inOut(2)").unwrap();
        assert_eq!(Ease::parse(&e.to_string()).unwrap(), e);
    }

    #[test]
    fn rejects_unknown() {
        assert!(Ease::parse("elastic.out").is_err());
        assert!(Ease::parse("power2.sideways").is_err());
        assert!(Ease::parse("power2(3)").is_err());
        assert!(Ease::parse("back.out(x)").is_err());
    }
}
