//! StyleMap: an insertion-ordered set of property values for one element.

use indexmap::IndexMap;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::coercion::coerce;
use crate::error::ApiError;
use crate::property::Property;
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap(IndexMap<Property, Value>);

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert. Values that cannot be coerced are stored as given
    /// and reported later by [`StyleMap::validate`].
    pub fn with(mut self, property: Property, value: impl Into<Value>) -> Self {
        let value = value.into();
        let value = coerce(value.clone(), property.kind()).unwrap_or(value);
        self.0.insert(property, value);
        self
    }

    /// Insert a value after coercing it into the property's kind.
    pub fn try_set(&mut self, property: Property, value: Value) -> Result<(), ApiError> {
        let actual = value.kind();
        let coerced = coerce(value, property.kind()).ok_or_else(|| ApiError::KindMismatch {
            property: property.as_str().to_string(),
            expected: property.kind(),
            actual,
        })?;
        self.0.insert(property, coerced);
        Ok(())
    }

    pub fn get(&self, property: Property) -> Option<&Value> {
        self.0.get(&property)
    }

    pub fn contains(&self, property: Property) -> bool {
        self.0.contains_key(&property)
    }

    pub fn remove(&mut self, property: Property) -> Option<Value> {
        self.0.shift_remove(&property)
    }

    pub fn properties(&self) -> impl Iterator<Item = Property> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Property, &Value)> {
        self.0.iter().map(|(p, v)| (*p, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check every value against its property's kind.
    pub fn validate(&self) -> Result<(), ApiError> {
        for (p, v) in self.iter() {
            p.check(v)?;
        }
        Ok(())
    }
}

impl FromIterator<(Property, Value)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (Property, Value)>>(iter: I) -> Self {
        let mut map = StyleMap::new();
        for (p, v) in iter {
            map = map.with(p, v);
        }
        map
    }
}

// Serialize as a plain JSON object keyed by property name.
impl Serialize for StyleMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (p, v) in &self.0 {
            map.serialize_entry(p.as_str(), v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StyleMap {
    fn deserialize<D>(deserializer: D) -> Result<StyleMap, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: IndexMap<String, Value> = IndexMap::deserialize(deserializer)?;
        let mut out = StyleMap::new();
        for (name, value) in raw {
            let property = Property::parse(&name).map_err(de::Error::custom)?;
            out.try_set(property, value).map_err(de::Error::custom)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn deserialize_coerces_css_strings() {
        let map: StyleMap = serde_json::from_str(
            r##"{ "opacity": 0, "filter": "blur(10px)", "backgroundColor": "#ffffff" }"##,
        )
        .unwrap();
        assert_eq!(map.get(Property::Opacity), Some(&Value::Float(0.0)));
        assert_eq!(map.get(Property::Blur), Some(&Value::Float(10.0)));
        assert_eq!(
            map.get(Property::BackgroundColor),
            Some(&Value::ColorRgba([1.0, 1.0, 1.0, 1.0]))
        );
        let order: Vec<_> = map.properties().collect();
        assert_eq!(
            order,
            vec![Property::Opacity, Property::Blur, Property::BackgroundColor]
        );
    }

    #[test]
    fn deserialize_rejects_unknown_property() {
        let err = serde_json::from_str::<StyleMap>(r#"{ "zIndex": 3 }"#).unwrap_err();
        assert!(err.to_string().contains("zIndex"));
    }

    #[test]
    fn try_set_reports_mismatch() {
        let mut map = StyleMap::new();
        let err = map
            .try_set(Property::Opacity, Value::rgba(1.0, 0.0, 0.0, 1.0))
            .unwrap_err();
        assert_eq!(
            err,
            ApiError::KindMismatch {
                property: "opacity".into(),
                expected: ValueKind::Float,
                actual: ValueKind::ColorRgba,
            }
        );
    }
}
