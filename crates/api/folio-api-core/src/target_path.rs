//! TargetPath parsing and formatting.
//!
//! Grammar:
//!   namespace/.../element[index]
//! - '/' separates namespace segments; the first one is the section id
//! - the last segment names the element
//! - an optional `[index]` selects one member of a repeated group
//!   Examples:
//!   "about/image" -> namespaces=["about"], target="image", index=None
//!   "about/skill-item[3]" -> namespaces=["about"], target="skill-item", index=Some(3)
//!   "preloader" -> namespaces=[], target="preloader", index=None
//!
//! A path without an index that names a repeated group is expanded by the
//! stage into its indexed members.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetPath {
    /// Namespace segments preceding the element (may be empty)
    pub namespaces: Vec<String>,
    /// Element name (last segment)
    pub target: String,
    /// Member index within a repeated group
    pub index: Option<usize>,
}

impl TargetPath {
    /// Construct a TargetPath from components.
    pub fn new(namespaces: Vec<String>, target: impl Into<String>, index: Option<usize>) -> Self {
        Self {
            namespaces,
            target: target.into(),
            index,
        }
    }

    /// Parse a path string according to the grammar described above.
    pub fn parse(s: &str) -> Result<Self, ApiError> {
        let invalid = |why: &str| ApiError::InvalidPath(format!("'{s}': {why}"));
        if s.is_empty() {
            return Err(invalid("empty path"));
        }
        let mut parts: Vec<&str> = s.split('/').collect();
        if parts.iter().any(|seg| seg.is_empty()) {
            return Err(invalid("empty segment"));
        }
        if parts.iter().any(|seg| seg.chars().any(char::is_whitespace)) {
            return Err(invalid("segment contains whitespace"));
        }
        let last = match parts.pop() {
            Some(last) => last,
            None => return Err(invalid("missing element")),
        };
        let (target, index) = match last.find('[') {
            Some(open) => {
                let close = last
                    .strip_suffix(']')
                    .ok_or_else(|| invalid("unterminated index"))?;
                let idx = close[open + 1..]
                    .parse::<usize>()
                    .map_err(|_| invalid("index is not a number"))?;
                (&last[..open], Some(idx))
            }
            None => (last, None),
        };
        if target.is_empty() {
            return Err(invalid("empty element name"));
        }
        if parts.iter().any(|seg| seg.contains('[') || seg.contains(']')) {
            return Err(invalid("index only allowed on the last segment"));
        }

        Ok(TargetPath {
            namespaces: parts.into_iter().map(|p| p.to_string()).collect(),
            target: target.to_string(),
            index,
        })
    }

    /// Section owning this element: the first namespace, or the element itself
    /// for top-level paths.
    pub fn section(&self) -> &str {
        self.namespaces
            .first()
            .map(|s| s.as_str())
            .unwrap_or(self.target.as_str())
    }

    /// The same element addressed as the `index`-th member of its group.
    pub fn member(&self, index: usize) -> Self {
        Self {
            namespaces: self.namespaces.clone(),
            target: self.target.clone(),
            index: Some(index),
        }
    }

    /// The group path (index stripped).
    pub fn group(&self) -> Self {
        Self {
            namespaces: self.namespaces.clone(),
            target: self.target.clone(),
            index: None,
        }
    }

    /// True when `self` is an indexed member of `group`.
    pub fn is_member_of(&self, group: &TargetPath) -> bool {
        self.index.is_some()
            && group.index.is_none()
            && self.target == group.target
            && self.namespaces == group.namespaces
    }

    /// True when `self` is nested below the element `ancestor`
    /// (`preloader/logo` is within `preloader`).
    pub fn is_within(&self, ancestor: &TargetPath) -> bool {
        if ancestor.index.is_some() || self.namespaces.len() <= ancestor.namespaces.len() {
            return false;
        }
        let depth = ancestor.namespaces.len();
        self.namespaces[..depth] == ancestor.namespaces[..]
            && self.namespaces[depth] == ancestor.target
    }

    /// True when this path lives under the section `id`.
    pub fn in_section(&self, id: &str) -> bool {
        self.section() == id
    }
}

impl fmt::Display for TargetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ns in &self.namespaces {
            f.write_str(ns)?;
            f.write_str("/")?;
        }
        f.write_str(&self.target)?;
        if let Some(i) = self.index {
            write!(f, "[{i}]")?;
        }
        Ok(())
    }
}

impl FromStr for TargetPath {
    type Err = ApiError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TargetPath::parse(s)
    }
}

// Serde support: serialize as string, deserialize from string
impl Serialize for TargetPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TargetPath {
    fn deserialize<D>(deserializer: D) -> Result<TargetPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        TargetPath::parse(&s).map_err(de::Error::custom)
    }
}
