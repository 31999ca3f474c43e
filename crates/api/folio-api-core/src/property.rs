//! The renderer-supported property set.
//!
//! Names follow the tween-library spelling the page was authored in
//! (`opacity`, `x`, `backgroundColor`, ...). `filter: blur(Npx)` is
//! flattened to the `blur` property carrying the radius in px.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;
use crate::value::{Value, ValueKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    Opacity,
    X,
    Y,
    Scale,
    Rotation,
    Blur,
    /// Width in percent of the parent.
    Width,
    Text,
    BackgroundColor,
    Color,
}

impl Property {
    pub const ALL: [Property; 10] = [
        Property::Opacity,
        Property::X,
        Property::Y,
        Property::Scale,
        Property::Rotation,
        Property::Blur,
        Property::Width,
        Property::Text,
        Property::BackgroundColor,
        Property::Color,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Property::Opacity => "opacity",
            Property::X => "x",
            Property::Y => "y",
            Property::Scale => "scale",
            Property::Rotation => "rotation",
            Property::Blur => "blur",
            Property::Width => "width",
            Property::Text => "text",
            Property::BackgroundColor => "backgroundColor",
            Property::Color => "color",
        }
    }

    pub fn parse(name: &str) -> Result<Self, ApiError> {
        let prop = match name {
            "opacity" => Property::Opacity,
            "x" => Property::X,
            "y" => Property::Y,
            "scale" => Property::Scale,
            "rotation" | "rotate" => Property::Rotation,
            "blur" | "filter" => Property::Blur,
            "width" => Property::Width,
            "text" | "textContent" => Property::Text,
            "backgroundColor" | "background-color" => Property::BackgroundColor,
            "color" => Property::Color,
            other => return Err(ApiError::UnknownProperty(other.to_string())),
        };
        Ok(prop)
    }

    /// Kind of value this property accepts.
    pub fn kind(self) -> ValueKind {
        match self {
            Property::Text => ValueKind::Text,
            Property::BackgroundColor | Property::Color => ValueKind::ColorRgba,
            _ => ValueKind::Float,
        }
    }

    /// Value an element has before anything was written to it.
    pub fn default_value(self) -> Value {
        match self {
            Property::Opacity | Property::Scale => Value::Float(1.0),
            Property::Text => Value::Text(String::new()),
            Property::BackgroundColor => Value::ColorRgba([0.0, 0.0, 0.0, 0.0]),
            Property::Color => Value::ColorRgba([1.0, 1.0, 1.0, 1.0]),
            _ => Value::Float(0.0),
        }
    }

    /// Check that `value` has the kind this property accepts.
    pub fn check(self, value: &Value) -> Result<(), ApiError> {
        if value.kind() == self.kind() {
            Ok(())
        } else {
            Err(ApiError::KindMismatch {
                property: self.as_str().to_string(),
                expected: self.kind(),
                actual: value.kind(),
            })
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = ApiError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Property::parse(s)
    }
}

impl Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Property {
    fn deserialize<D>(deserializer: D) -> Result<Property, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Property::parse(&s).map_err(de::Error::custom)
    }
}
