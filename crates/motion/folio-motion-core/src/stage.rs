//! The renderer seam.
//!
//! Timelines and tweens never touch a DOM directly; they read and write
//! through [`Stage`]. Hosts implement it over their element tree, or use
//! [`MemoryStage`] and replay its [`WriteBatch`] each frame.

use hashbrown::HashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use folio_api_core::{Property, StyleMap, StyleWrite, TargetPath, Value, WriteBatch};

use crate::geometry::ElementRect;

pub trait Stage {
    /// True when the element is attached.
    fn contains(&self, target: &TargetPath) -> bool;

    /// Current value of `property`, falling back to the property default for
    /// an attached element that was never written. `None` when detached.
    fn read(&self, target: &TargetPath, property: Property) -> Option<Value>;

    /// Apply a value. Returns false (and applies nothing) when detached.
    fn write(&mut self, target: &TargetPath, property: Property, value: Value) -> bool;

    /// Attached members of a repeated group, ordered by index.
    fn query(&self, group: &TargetPath) -> Vec<TargetPath>;

    /// Layout rectangle of an element, when the host knows it.
    fn rect(&self, _target: &TargetPath) -> Option<ElementRect> {
        None
    }
}

/// Declarative description of a stage, as stored in fixtures or sent by a
/// browser host at startup.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct StageLayout {
    #[serde(default)]
    pub elements: IndexMap<TargetPath, ElementLayout>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ElementLayout {
    /// When set, the path names a repeated group with this many members.
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub rect: Option<ElementRect>,
    #[serde(default)]
    pub style: StyleMap,
}

#[derive(Clone, Debug, Default)]
struct Element {
    style: StyleMap,
    rect: Option<ElementRect>,
}

/// In-process stage: element styles in a hash map, every effective write
/// recorded for the host to drain.
#[derive(Debug, Default)]
pub struct MemoryStage {
    elements: HashMap<TargetPath, Element>,
    writes: WriteBatch,
    rejected: usize,
}

impl MemoryStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_layout(layout: &StageLayout) -> Self {
        let mut stage = Self::new();
        for (path, el) in &layout.elements {
            match el.count {
                Some(n) => {
                    for i in 0..n {
                        stage.insert_with(path.member(i), el.style.clone());
                    }
                }
                None => {
                    stage.insert_with(path.clone(), el.style.clone());
                    if let Some(rect) = el.rect {
                        stage.set_rect(path, rect);
                    }
                }
            }
        }
        stage
    }

    /// Attach an element with no explicit style.
    pub fn insert(&mut self, target: TargetPath) {
        self.insert_with(target, StyleMap::new());
    }

    pub fn insert_with(&mut self, target: TargetPath, style: StyleMap) {
        self.elements.insert(
            target,
            Element {
                style,
                rect: None,
            },
        );
    }

    /// Attach `count` indexed members of `group`.
    pub fn insert_group(&mut self, group: &TargetPath, count: usize) {
        for i in 0..count {
            self.insert(group.member(i));
        }
    }

    /// Detach an element with its subtree (and every member when `target`
    /// names a group).
    pub fn remove(&mut self, target: &TargetPath) -> bool {
        let before = self.elements.len();
        self.elements.retain(|path, _| {
            path != target && !path.is_member_of(target) && !path.is_within(target)
        });
        before != self.elements.len()
    }

    /// Detach every element under section `id`.
    pub fn remove_section(&mut self, id: &str) -> usize {
        let before = self.elements.len();
        self.elements.retain(|path, _| !path.in_section(id));
        before - self.elements.len()
    }

    pub fn set_rect(&mut self, target: &TargetPath, rect: ElementRect) -> bool {
        match self.elements.get_mut(target) {
            Some(el) => {
                el.rect = Some(rect);
                true
            }
            None => false,
        }
    }

    pub fn style(&self, target: &TargetPath) -> Option<&StyleMap> {
        self.elements.get(target).map(|el| &el.style)
    }

    /// Explicit value only (no default fallback).
    pub fn value(&self, target: &TargetPath, property: Property) -> Option<&Value> {
        self.elements.get(target).and_then(|el| el.style.get(property))
    }

    /// Writes applied since the last drain.
    pub fn writes(&self) -> &WriteBatch {
        &self.writes
    }

    pub fn take_writes(&mut self) -> WriteBatch {
        std::mem::take(&mut self.writes)
    }

    /// Number of writes refused because the element was detached.
    pub fn rejected_writes(&self) -> usize {
        self.rejected
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl Stage for MemoryStage {
    fn contains(&self, target: &TargetPath) -> bool {
        self.elements.contains_key(target)
    }

    fn read(&self, target: &TargetPath, property: Property) -> Option<Value> {
        self.elements.get(target).map(|el| {
            el.style
                .get(property)
                .cloned()
                .unwrap_or_else(|| property.default_value())
        })
    }

    fn write(&mut self, target: &TargetPath, property: Property, value: Value) -> bool {
        let Some(el) = self.elements.get_mut(target) else {
            self.rejected += 1;
            log::trace!("stage: dropped write to detached {target}.{property}");
            return false;
        };
        if el.style.get(property) == Some(&value) {
            return true;
        }
        // Values reaching the stage come from kind-checked steps.
        let _ = el.style.try_set(property, value.clone());
        self.writes
            .push(StyleWrite::new(target.clone(), property, value));
        true
    }

    fn query(&self, group: &TargetPath) -> Vec<TargetPath> {
        let mut members: Vec<TargetPath> = self
            .elements
            .keys()
            .filter(|p| p.is_member_of(group))
            .cloned()
            .collect();
        members.sort_by_key(|p| p.index);
        members
    }

    fn rect(&self, target: &TargetPath) -> Option<ElementRect> {
        self.elements.get(target).and_then(|el| el.rect)
    }
}
