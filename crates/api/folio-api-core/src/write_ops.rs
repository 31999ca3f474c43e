//! Style writes produced by timelines and tweens, described against typed
//! target paths so a host can replay them onto its own element tree.
//!
//! StyleWrite serializes to JSON as:
//!   { "target": "about/image", "property": "opacity", "value": 0.5 }
//!
//! WriteBatch is a simple Vec<StyleWrite> with helpers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Property, TargetPath, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleWrite {
    pub target: TargetPath,
    pub property: Property,
    pub value: Value,
}

impl StyleWrite {
    pub fn new(target: TargetPath, property: Property, value: Value) -> Self {
        Self {
            target,
            property,
            value,
        }
    }
}

/// A batch of style writes. The stage accumulates one per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch(pub Vec<StyleWrite>);

impl WriteBatch {
    pub fn new() -> Self {
        WriteBatch(Vec::new())
    }

    pub fn push(&mut self, op: StyleWrite) {
        self.0.push(op);
    }

    pub fn extend(&mut self, other: impl IntoIterator<Item = StyleWrite>) {
        self.0.extend(other);
    }

    pub fn into_vec(self) -> Vec<StyleWrite> {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleWrite> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge another batch in-place (append).
    pub fn append(&mut self, mut other: WriteBatch) {
        self.0.append(&mut other.0)
    }

    /// Last value written for `(target, property)` in this batch.
    pub fn last_value(&self, target: &TargetPath, property: Property) -> Option<&Value> {
        self.0
            .iter()
            .rev()
            .find(|w| &w.target == target && w.property == property)
            .map(|w| &w.value)
    }

    /// Writes touching `target`, in order.
    pub fn for_target<'a>(&'a self, target: &'a TargetPath) -> impl Iterator<Item = &'a StyleWrite> {
        self.0.iter().filter(move |w| &w.target == target)
    }
}

impl IntoIterator for WriteBatch {
    type Item = StyleWrite;
    type IntoIter = std::vec::IntoIter<StyleWrite>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for StyleWrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ target: {}, {}: {} }}",
            self.target, self.property, self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape() {
        let w = StyleWrite::new(
            TargetPath::parse("about/image").unwrap(),
            Property::Opacity,
            Value::f(0.5),
        );
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "target": "about/image", "property": "opacity", "value": 0.5 })
        );
        let back: StyleWrite = serde_json::from_value(json).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn last_value_prefers_latest() {
        let t = TargetPath::parse("hero/cta").unwrap();
        let mut b = WriteBatch::new();
        b.push(StyleWrite::new(t.clone(), Property::Scale, Value::f(0.8)));
        b.push(StyleWrite::new(t.clone(), Property::Scale, Value::f(1.0)));
        assert_eq!(b.last_value(&t, Property::Scale), Some(&Value::f(1.0)));
        assert_eq!(b.for_target(&t).count(), 2);
    }
}
